//! Plain text rendering of group summaries.

use std::fmt::Write;

use engine::{Group, GroupBalance, GroupsOverview, MoneyCents, UserDirectory};

pub fn group_summary(
    users: &UserDirectory,
    group: &Group,
    balance: &GroupBalance,
    shares: &[(engine::UserId, MoneyCents)],
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} members: {})",
        group.name,
        group.member_count(),
        users.member_names(&group.members)
    );

    let per_person = shares.first().map_or(MoneyCents::ZERO, |(_, share)| *share);
    let _ = writeln!(
        out,
        "  total {}, {} per person",
        balance.total_expenses, per_person
    );

    for member in &group.members {
        let net = balance.net_for(member);
        let status = if net.is_positive() {
            format!("is owed {net}")
        } else if net.is_negative() {
            format!("owes {}", -net)
        } else {
            "settled".to_string()
        };
        let _ = writeln!(out, "  {}: {status}", users.display_name(member));
    }
    out
}

pub fn overview_line(overview: &GroupsOverview) -> String {
    format!(
        "{} groups, {} members, {} total",
        overview.group_count, overview.distinct_members, overview.total_expenses
    )
}

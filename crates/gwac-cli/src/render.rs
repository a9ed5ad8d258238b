//! Plain-text rendering of reports and rule tables.

use acl_engine::{ActionRecord, Outcome, ReconciliationReport, Role, RuleTable};

const REPORT_HEADERS: [&str; 6] = ["ACTION", "IDENTITY", "SCOPE", "BEFORE", "AFTER", "OUTCOME"];
const RULE_HEADERS: [&str; 4] = ["GROUP", "TARGET", "ROLE", "SCOPE"];

pub fn report_table(report: &ReconciliationReport) -> String {
    let rows: Vec<Vec<String>> = report.actions.iter().map(report_row).collect();

    let mut out = String::new();
    if report.dry_run {
        out.push_str(&format!("Dry run for {} (nothing was written)\n\n", report.subject));
    } else {
        out.push_str(&format!("Reconciled calendar of {}\n\n", report.subject));
    }

    if rows.is_empty() {
        out.push_str("No manageable ACL entries and no matching rules.\n");
    } else {
        out.push_str(&table(&REPORT_HEADERS, &rows));
    }

    let summary = report.summary();
    out.push_str(&format!(
        "\n{} added, {} updated, {} removed, {} unchanged, {} failed; {} preserved\n",
        summary.added,
        summary.updated,
        summary.removed,
        summary.unchanged,
        summary.failed,
        report.preserved.len(),
    ));
    match (&report.after, &report.after_error) {
        (Some(after), _) => out.push_str(&format!(
            "ACL entries: {} before, {} after\n",
            report.before.len(),
            after.len()
        )),
        (None, error) => {
            out.push_str(&format!(
                "ACL entries: {} before, final ACL unavailable\n",
                report.before.len()
            ));
            if let Some(error) = error {
                out.push_str(&format!("warning: final ACL could not be read: {error}\n"));
            }
        }
    }
    out
}

pub fn rules_table(rules: &RuleTable) -> String {
    let rows: Vec<Vec<String>> = rules
        .iter()
        .map(|r| {
            vec![
                r.source_group.clone(),
                r.target_identity.clone(),
                r.role.to_string(),
                r.scope_type.to_string(),
            ]
        })
        .collect();

    let mut out = table(&RULE_HEADERS, &rows);
    out.push_str(&format!(
        "\n{} rules across {} groups\n",
        rules.len(),
        rules.groups().count()
    ));
    out
}

fn report_row(record: &ActionRecord) -> Vec<String> {
    let outcome = match &record.outcome {
        Outcome::Applied => "ok".to_string(),
        Outcome::Unchanged => "-".to_string(),
        Outcome::Planned => "planned".to_string(),
        Outcome::Failed(message) => format!("FAILED: {message}"),
    };
    vec![
        record.kind.to_string(),
        record.identity.clone(),
        record.scope_type.to_string(),
        role_cell(record.before),
        role_cell(record.after),
        outcome,
    ]
}

fn role_cell(role: Option<Role>) -> String {
    role.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Left-aligned columns separated by two spaces. The last column is not padded.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    for row in std::iter::once(&header_cells).chain(rows) {
        let last = row.len().saturating_sub(1);
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i == last {
                    cell.clone()
                } else {
                    format!("{:<width$}", cell, width = widths[i])
                }
            })
            .collect();
        out.push_str(&line.join("  "));
        out.push('\n');
    }
    out
}

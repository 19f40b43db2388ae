use crate::model::{AcceptedDesign, MetricStats, TrajectoryStats};
use crate::storage::BucketLayout;
use bindcraft_summary_model::{LogSummary, RunSettings};
use std::borrow::Cow;
use std::fmt;

const MISSING: &str = "N/A";

/// The summary page of a design run.
///
/// Rendering is pure: the page only depends on the values it is built from, so rendering the
/// same inputs twice yields the same bytes. Use [ToString::to_string] or `write!` to render.
pub struct SummaryReport<'a> {
    pub settings: &'a RunSettings,
    pub log_summary: &'a LogSummary,
    pub layout: &'a BucketLayout,
    pub trajectory_stats: &'a TrajectoryStats,
    pub accepted_designs: &'a [AcceptedDesign],
}

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = self.settings;
        let binder_name = escape_html(&settings.binder_name);

        write!(
            f,
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>BindCraft Results: {binder_name}</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        .container {{ max-width: 1200px; margin: 0 auto; }}
        .summary {{ background-color: #f5f5f5; padding: 20px; border-radius: 5px; margin-bottom: 20px; }}
        .results {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(300px, 1fr)); gap: 20px; }}
        .results h2 {{ grid-column: 1 / -1; }}
        .design-card {{ border: 1px solid #ddd; padding: 15px; border-radius: 5px; }}
        .stats {{ margin-top: 20px; margin-bottom: 20px; }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ padding: 8px; text-align: left; border-bottom: 1px solid #ddd; }}
        th {{ background-color: #f5f5f5; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>BindCraft Results: {binder_name}</h1>

        <div class="summary">
            <h2>Summary</h2>
            <p><strong>Target:</strong> {binder_name}</p>
"#
        )?;

        if let Some(starting_pdb) = &settings.starting_pdb {
            summary_line(f, "Target Structure", &escape_html(starting_pdb))?;
        }
        if let Some(chains) = &settings.chains {
            summary_line(f, "Target Chains", &escape_html(chains))?;
        }
        summary_line(
            f,
            "Hotspot Residues",
            &escape_html(&settings.target_hotspot_residues),
        )?;
        summary_line(
            f,
            "Binder Length Range",
            &format!("{} - {} residues", settings.lengths.0, settings.lengths.1),
        )?;
        summary_line(
            f,
            "Number of Trajectories",
            &self.log_summary.trajectories.len().to_string(),
        )?;
        match settings.number_of_final_designs {
            Some(requested) => summary_line(
                f,
                "Accepted Designs",
                &format!(
                    "{} of {requested} requested",
                    self.log_summary.accepted_designs.len()
                ),
            )?,
            None => summary_line(
                f,
                "Accepted Designs",
                &self.log_summary.accepted_designs.len().to_string(),
            )?,
        }
        summary_line(
            f,
            "Completion Time",
            &self
                .log_summary
                .end_time
                .as_deref()
                .map(escape_html)
                .unwrap_or(Cow::Borrowed(MISSING)),
        )?;

        write!(
            f,
            r#"        </div>

        <div class="stats">
            <h2>Trajectory Statistics</h2>
            <table>
                <tr>
                    <th>Metric</th>
                    <th>Average</th>
                    <th>Best</th>
                </tr>
"#
        )?;
        let stats = self.trajectory_stats;
        stats_row(f, "pLDDT", &stats.plddt)?;
        stats_row(f, "pTM", &stats.ptm)?;
        stats_row(f, "Interface pLDDT", &stats.i_plddt)?;

        write!(
            f,
            r#"            </table>
        </div>

        <div class="results">
            <h2>Accepted Designs</h2>
"#
        )?;
        let design_path = settings.design_path();
        for design in self.accepted_designs {
            design_card(f, self.layout, design_path, design)?;
        }

        write!(
            f,
            r#"        </div>
    </div>
</body>
</html>
"#
        )
    }
}

fn summary_line(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    writeln!(f, "            <p><strong>{label}:</strong> {value}</p>")
}

fn stats_row(f: &mut fmt::Formatter<'_>, label: &str, stats: &MetricStats) -> fmt::Result {
    write!(
        f,
        r#"                <tr>
                    <td>{label}</td>
                    <td>{mean:.2}</td>
                    <td>{max:.2}</td>
                </tr>
"#,
        mean = stats.mean,
        max = stats.max,
    )
}

fn design_card(
    f: &mut fmt::Formatter<'_>,
    layout: &BucketLayout,
    design_path: &str,
    design: &AcceptedDesign,
) -> fmt::Result {
    write!(
        f,
        r#"            <div class="design-card">
                <h3>{name}</h3>
                <p><strong>pLDDT:</strong> {plddt}</p>
                <p><strong>pTM:</strong> {ptm}</p>
                <p><strong>Interface pLDDT:</strong> {i_plddt}</p>
                <p><a href="{pdb_url}">Download PDB</a></p>
                <p><a href="{animation_url}">View Animation</a></p>
            </div>
"#,
        name = escape_html(&design.design_name),
        plddt = format_metric(design.plddt),
        ptm = format_metric(design.ptm),
        i_plddt = format_metric(design.i_plddt),
        pdb_url = escape_html(&layout.accepted_pdb_url(design_path, &design.design_name)),
        animation_url = escape_html(&layout.animation_url(design_path, &design.design_name)),
    )
}

fn format_metric(value: Option<f64>) -> Cow<'static, str> {
    match value {
        Some(value) => Cow::Owned(format!("{value:.2}")),
        None => Cow::Borrowed(MISSING),
    }
}

/// Escape text for use in HTML content and double-quoted attributes.
pub(crate) fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

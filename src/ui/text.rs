//! Plain-text rendering of an analysis for non-interactive output.

use crate::logic::pipeline::AnalysisReport;
use crate::logic::projection::ParameterProjection;
use crate::models::format_reading;
use std::fmt::Write;

pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    let selection = &report.selection;
    let range = selection.range();

    writeln!(out, "AgroInsight report")?;
    writeln!(out, "==================")?;
    writeln!(out, "Crops:    {}", selection.crop_names().join(", "))?;
    writeln!(out, "Area:     {}", selection.size())?;
    writeln!(out, "Location: {}", selection.coordinate())?;
    writeln!(
        out,
        "Period:   {} to {} ({} days)",
        range.start,
        range.end,
        range.span_days()
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "Advisories ({} need action)",
        report.actionable().count()
    )?;
    writeln!(out, "--------------------------")?;
    if report.advisories.is_empty() {
        writeln!(out, "  (none: the first day has no usable readings)")?;
    }
    for advisory in &report.advisories {
        writeln!(
            out,
            "  {} [{}] {}",
            advisory.symbol(),
            advisory.category,
            advisory.message
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Parameters")?;
    writeln!(out, "----------")?;
    for projection in &report.projections {
        match projection {
            ParameterProjection::Available(view) => writeln!(
                out,
                "  {:<20} {:>10}  min {} / max {} over {} days  {}",
                view.code,
                format_reading(view.metric),
                format_reading(view.min()),
                format_reading(view.max()),
                view.series.len(),
                view.label
            )?,
            ParameterProjection::NoValidData { code, label } => {
                writeln!(out, "  {:<20} {:>10}  {}", code, "no data", label)?
            }
        }
    }
    writeln!(out)?;

    writeln!(out, "Insights")?;
    writeln!(out, "--------")?;
    writeln!(out, "{}", report.insights.text)?;
    if let Some(ref diagnostic) = report.insights.diagnostic {
        writeln!(out)?;
        writeln!(out, "Details: {}", diagnostic)?;
    }

    Ok(())
}

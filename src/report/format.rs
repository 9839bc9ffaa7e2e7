//! Formatted terminal output for feed loads, panels and simulations.
//!
//! Formatting lives here so the parsing/deriving code stays free of
//! presentation concerns and output changes stay localized.

use crate::derive::{DerivedPanels, MONTH_LABELS};
use crate::domain::{FeedSource, PanelKind};
use crate::io::ingest::{ParsedFeed, RowRejection};
use crate::report::series_stats;
use crate::sim::{SimulationLog, SimulationOutcome};

/// Header block for one feed load.
pub fn format_feed_summary(source: &FeedSource, feed: &ParsedFeed, panels: &DerivedPanels) -> String {
    let mut out = String::new();

    out.push_str("=== sdash - Search Dashboard ===\n");
    out.push_str(&format!("Feed: {source}\n"));
    out.push_str(&format!(
        "Rows: read={} | used={} | rejected={} | delimiter={}\n",
        feed.rows_read,
        feed.rows_used(),
        feed.rejected.len(),
        feed.delimiter.display_name(),
    ));

    let u = &panels.universe;
    let span = match (u.dates.first(), u.dates.last()) {
        (Some(first), Some(last)) => format!(" [{first} .. {last}]"),
        _ => String::new(),
    };
    out.push_str(&format!("Brands: {} ({})\n", u.brands.len(), u.brands.join(", ")));
    out.push_str(&format!("Dates: {}{span}\n", u.dates.len()));
    out.push('\n');

    out
}

/// One section per derived panel.
pub fn format_panels(panels: &DerivedPanels) -> String {
    let mut out = String::new();

    for kind in PanelKind::ALL {
        if !panels.is_present(kind) {
            continue;
        }
        out.push_str(&format!("{}:\n", kind.title()));
        match kind {
            PanelKind::Share => out.push_str(&format_share(panels)),
            PanelKind::Heatmap => out.push_str(&format_heatmap_table(panels)),
            _ => out.push_str(&format_series_table(panels, kind)),
        }
        out.push('\n');
    }

    out
}

fn format_series_table(panels: &DerivedPanels, kind: PanelKind) -> String {
    let mut out = String::new();
    let Some(series) = panels.brand_series(kind) else {
        return out;
    };

    out.push_str(&format!(
        "{:<20} {:>6} {:>14} {:>14} {:>14} {:>14}\n",
        "brand", "n", "min", "mean", "max", "last"
    ));
    out.push_str(&format!(
        "{:-<20} {:-<6} {:-<14} {:-<14} {:-<14} {:-<14}\n",
        "", "", "", "", "", ""
    ));
    for s in series_stats(series) {
        out.push_str(&format!(
            "{:<20} {:>6} {:>14.2} {:>14.2} {:>14.2} {:>14.2}\n",
            truncate(&s.brand, 20),
            s.n,
            s.min,
            s.mean,
            s.max,
            s.last
        ));
    }

    out
}

fn format_share(panels: &DerivedPanels) -> String {
    let mut out = String::new();
    let Some(share) = &panels.share else {
        return out;
    };
    let Some(last) = share.dates.len().checked_sub(1) else {
        out.push_str("(no dates)\n");
        return out;
    };

    out.push_str(&format!("{:<20} {:>10} {:>10}\n", "brand", "mean %", "last %"));
    out.push_str(&format!("{:-<20} {:-<10} {:-<10}\n", "", "", ""));
    for b in &share.brands {
        let mean = b.shares.iter().sum::<f64>() / b.shares.len().max(1) as f64;
        out.push_str(&format!(
            "{:<20} {:>10.2} {:>10.2}\n",
            truncate(&b.brand, 20),
            mean,
            b.shares[last]
        ));
    }
    out.push_str(&format!("(last = {})\n", share.dates[last]));

    out
}

fn format_heatmap_table(panels: &DerivedPanels) -> String {
    let mut out = String::new();
    let Some(grid) = &panels.heatmap else {
        return out;
    };

    out.push_str(&format!("{:<6}", "year"));
    for label in MONTH_LABELS {
        out.push_str(&format!(" {label:>7}"));
    }
    out.push('\n');

    for (year, cells) in grid.years.iter().zip(&grid.cells) {
        out.push_str(&format!("{year:<6}"));
        for cell in cells {
            match cell {
                Some(v) => out.push_str(&format!(" {v:>7.2}")),
                None => out.push_str(&format!(" {:>7}", "-")),
            }
        }
        out.push('\n');
    }
    if grid.skipped > 0 {
        out.push_str(&format!("({} records without year/month skipped)\n", grid.skipped));
    }

    out
}

/// Rejected lines, at most `limit` of them.
pub fn format_rejections(rejected: &[RowRejection], limit: usize) -> String {
    let mut out = String::new();
    if rejected.is_empty() {
        out.push_str("No rejected rows.\n");
        return out;
    }

    out.push_str(&format!("{:>6}  {:<32} {}\n", "line", "reason", "raw"));
    out.push_str(&format!("{:-<6}  {:-<32} {:-<24}\n", "", "", ""));
    for r in rejected.iter().take(limit) {
        let row = format!("{:>6}  {:<32} {}", r.line, truncate(&r.reason.to_string(), 32), r.raw);
        out.push_str(row.trim_end());
        out.push('\n');
    }
    if rejected.len() > limit {
        out.push_str(&format!("... {} more\n", rejected.len() - limit));
    }

    out
}

/// One simulation outcome: base vs scenario.
pub fn format_simulation(outcome: &SimulationOutcome) -> String {
    let r = &outcome.result;
    let q = &outcome.request;
    let mut out = String::new();

    out.push_str(&format!(
        "Simulation step {}{}\n",
        outcome.step.step,
        if outcome.cached { " (cached)" } else { "" }
    ));
    out.push_str(&format!("{:<10} {:>18} {:>18} {:>6} {:>18} {:>10}\n", "", "search", "live", "event", "revenue", "ROI"));
    out.push_str(&format!(
        "{:<10} {:>18} {:>18} {:>6} {:>18} {:>10.2}\n",
        "base",
        fmt_money(q.base_search_ad_cost),
        fmt_money(q.base_live_ad_cost),
        q.base_competitor_event.as_str(),
        fmt_money(r.base_revenue),
        r.base_roi
    ));
    out.push_str(&format!(
        "{:<10} {:>18} {:>18} {:>6} {:>18} {:>10.2}\n",
        "scenario",
        fmt_money(q.new_search_ad_cost),
        fmt_money(q.new_live_ad_cost),
        q.new_competitor_event.as_str(),
        fmt_money(r.new_revenue),
        r.new_roi
    ));
    out.push_str(&format!(
        "Change: revenue {} | ROI {:+.2}\n",
        fmt_signed_money(r.revenue_change),
        r.roi_change
    ));

    out
}

/// The session's step log.
pub fn format_sim_log(log: &SimulationLog) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>4} {:>18} {:>10}\n", "step", "revenue", "ROI"));
    out.push_str(&format!("{:-<4} {:-<18} {:-<10}\n", "", "", ""));
    for s in log.steps() {
        out.push_str(&format!("{:>4} {:>18} {:>10.2}\n", s.step, fmt_money(s.revenue), s.roi));
    }
    out
}

/// Whole number with thousands separators.
pub fn fmt_money(v: f64) -> String {
    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 { format!("-{grouped}") } else { grouped }
}

fn fmt_signed_money(v: f64) -> String {
    if v.round() > 0.0 {
        format!("+{}", fmt_money(v))
    } else {
        fmt_money(v)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

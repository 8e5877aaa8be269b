use std::io::Write;

use crate::{error::ReportError, histogram::Histogram, summary::Summary};

const BAR: char = '▇';

/// Format a duration with four significant digits, `%.4g` style, plus `ms`.
pub fn format_ms(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return format!("{v}ms");
    }
    // The exponent is taken after rounding: 9999.6 is 1.000e4, not 9.9996e3.
    let sci = format!("{v:.3e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits = if (-4..4).contains(&exp) {
        let decimals = (3 - exp) as usize;
        trim_zeros(format!("{v:.decimals$}"))
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_zeros(mantissa.to_string()), exp.abs())
    };
    format!("{digits}ms")
}

fn trim_zeros(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// One line per bucket: lower edge, share of samples, bar scaled so the
/// fullest bucket is `width` characters, count.
pub fn render_histogram(
    out: &mut impl Write,
    hist: &Histogram,
    width: usize,
) -> Result<(), ReportError> {
    let peak = hist.max_bucket_count();
    let labels: Vec<String> = hist.buckets.iter().map(|b| format_ms(b.min)).collect();
    let pad = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    for (bucket, label) in hist.buckets.iter().zip(&labels) {
        let share = if hist.count == 0 {
            0.0
        } else {
            100.0 * bucket.count as f64 / hist.count as f64
        };
        let len = if peak == 0 { 0 } else { bucket.count * width / peak };
        let bar: String = std::iter::repeat_n(BAR, len).collect();
        writeln!(out, "{label:>pad$}  {share:6.2}% {bar}\t{}", bucket.count)?;
    }
    Ok(())
}

/// Full text report: histogram, percentiles, failures.
pub fn render_summary(
    out: &mut impl Write,
    summary: &Summary,
    width: usize,
) -> Result<(), ReportError> {
    writeln!(out, "Histogram for executed producers")?;
    writeln!(out, "--------------------------------")?;
    if summary.histogram.is_empty() {
        writeln!(out, "no successful invocations")?;
    } else {
        render_histogram(out, &summary.histogram, width)?;
    }
    if summary.non_finite > 0 {
        writeln!(
            out,
            "{} of {} successful records had a non-finite duration and are not counted",
            summary.non_finite, summary.succeeded
        )?;
    }
    writeln!(out)?;

    if let Some(p) = &summary.percentiles {
        writeln!(out, "Percentiles")?;
        writeln!(out, "-----------")?;
        writeln!(out, "90th percentile: {:.2}", p.p90)?;
        writeln!(out, "99th percentile: {:.2}", p.p99)?;
        writeln!(out, "99.9th percentile: {:.2}", p.p999)?;
        writeln!(out)?;
    }

    if summary.failed() > 0 {
        writeln!(out, "Failures")?;
        writeln!(out, "--------")?;
        writeln!(
            out,
            "{} of {} invocations failed ({} execution, {} decode)",
            summary.failed(),
            summary.total,
            summary.execution_failures,
            summary.decode_failures
        )?;
        if let Some(first) = &summary.first_failure {
            writeln!(out, "first failure: {first}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_json(out: &mut impl Write, summary: &Summary) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut *out, summary)?;
    writeln!(out)?;
    Ok(())
}

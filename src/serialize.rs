//! Renders a finalized [`Report`] as `raw`, `json`, or `yaml`.

use std::fmt;
use std::str::FromStr;

use crate::errors::ConfigError;
use crate::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Raw,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(OutputFormat::Raw),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(ConfigError::InvalidOutputFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Raw => "raw",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        };
        f.write_str(s)
    }
}

/// Render `report` in the requested format. `json`/`yaml` never fail for a
/// well-formed `Report` (every field is a plain, serializable type), so this
/// returns a bare `String` rather than a `Result`.
pub fn serialize(report: &Report, format: OutputFormat) -> String {
    match format {
        OutputFormat::Raw => render_raw(report),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).expect("Report serialization is infallible")
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).expect("Report serialization is infallible")
        }
    }
}

fn render_raw(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total requests:  {}\n", report.total_requests));
    out.push_str(&format!("Successes:       {}\n", report.successes));
    out.push_str(&format!("Failures:        {}\n", report.failures));
    out.push_str(&format!(
        "  client errors: {}\n",
        report.error_breakdown.client_errors
    ));
    out.push_str(&format!(
        "  server errors: {}\n",
        report.error_breakdown.server_errors
    ));
    out.push_str(&format!("  timeouts:      {}\n", report.error_breakdown.timeouts));
    out.push_str("\nLatency (ms):\n");
    out.push_str(&format!("  min:  {}\n", report.latency.min_ms));
    out.push_str(&format!("  mean: {:.2}\n", report.latency.mean_ms));
    out.push_str(&format!("  p50:  {}\n", report.latency.p50_ms));
    out.push_str(&format!("  p95:  {}\n", report.latency.p95_ms));
    out.push_str(&format!("  p99:  {}\n", report.latency.p99_ms));
    out.push_str(&format!("  max:  {}\n", report.latency.max_ms));
    out.push_str("\nThroughput:\n");
    out.push_str(&format!(
        "  sent:     {} bytes ({:.2} B/s)\n",
        report.throughput.bytes_sent_total, report.throughput.bytes_sent_per_second
    ));
    out.push_str(&format!(
        "  received: {} bytes ({:.2} B/s)\n",
        report.throughput.bytes_received_total, report.throughput.bytes_received_per_second
    ));
    out.push_str(&format!("\nDuration: {} ms\n", report.duration_ms));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("raw".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn json_round_trips_through_serde_value() {
        let report = Report::empty().finalize(std::time::SystemTime::now(), std::time::SystemTime::now());
        let rendered = serialize(&report, OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["total_requests"], 0);
    }
}

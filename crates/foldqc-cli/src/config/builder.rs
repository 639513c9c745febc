use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::Cli;
use crate::error::{CliError, Result};
use foldqc::core::render::colormap::ColorScale;
use foldqc::engine::config::{BatchConfigBuilder, FailurePolicy};
use std::str::FromStr;

/// Merges CLI flags, `--set` overrides, the optional TOML file and built-in
/// defaults, in that order of precedence.
pub fn build_config(args: &Cli) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let scan_file = file_config.scan.take().unwrap_or_default();
    let scores_file = file_config.scores.take().unwrap_or_default();
    let heatmap_file = file_config.heatmap.take().unwrap_or_default();

    let failure_policy = match (
        args.failure_policy.fail_fast,
        args.failure_policy.isolate_failures,
    ) {
        (true, false) => FailurePolicy::FailFast,
        (false, true) => FailurePolicy::Isolate,
        _ => file_config
            .failure_policy
            .unwrap_or(defaults.failure_policy),
    };

    let scores_enabled = !args.no_scores && scores_file.enabled.unwrap_or(defaults.scores_enabled);
    let heatmaps_enabled =
        !args.no_heatmaps && heatmap_file.enabled.unwrap_or(defaults.heatmaps_enabled);
    let dpi = args.dpi.or(heatmap_file.dpi).unwrap_or(defaults.dpi);

    let mut builder = BatchConfigBuilder::new()
        .document_suffix(
            scan_file
                .document_suffix
                .unwrap_or(defaults.document_suffix),
        )
        .ignored_suffixes(
            scan_file
                .ignore_suffixes
                .unwrap_or(defaults.ignored_suffixes),
        )
        .scores_enabled(scores_enabled)
        .report_file_name(scores_file.report_file.unwrap_or(defaults.report_file))
        .heatmaps_enabled(heatmaps_enabled)
        .dpi(dpi)
        .figure_size(heatmap_file.figure_size.unwrap_or(defaults.figure_size))
        .max_render_bytes(
            heatmap_file
                .max_render_bytes
                .unwrap_or(defaults.max_render_bytes),
        )
        .failure_policy(failure_policy);
    if let Some(scale) = heatmap_file.color_scale {
        builder = builder.color_scale(scale);
    }

    let batch = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        root: args.root.clone(),
        batch,
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

/// Parses `a,b,c` into suffixes; an empty value clears the list.
fn parse_suffix_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses `auto` or `fixed:MIN:MAX`.
fn parse_color_scale(key: &str, value: &str) -> Result<ColorScale> {
    let mut parts = value.split(':');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("auto"), None, None, None) => Ok(ColorScale::Auto),
        (Some("fixed"), Some(min), Some(max), None) => Ok(ColorScale::Fixed {
            min: parse_value(key, min, "float")?,
            max: parse_value(key, max, "float")?,
        }),
        _ => Err(CliError::Config(format!(
            "Invalid value for {}: {} (expected 'auto' or 'fixed:MIN:MAX')",
            key, value
        ))),
    }
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "failure-policy" => {
                config.failure_policy = Some(match value_str {
                    "fail-fast" => FailurePolicy::FailFast,
                    "isolate" => FailurePolicy::Isolate,
                    _ => {
                        return Err(CliError::Config(format!(
                            "Invalid value for {}: {} (expected 'fail-fast' or 'isolate')",
                            key, value_str
                        )));
                    }
                });
            }
            "scan.document-suffix" => {
                config
                    .scan
                    .get_or_insert_with(Default::default)
                    .document_suffix = Some(value_str.to_string());
            }
            "scan.ignore-suffixes" => {
                config
                    .scan
                    .get_or_insert_with(Default::default)
                    .ignore_suffixes = Some(parse_suffix_list(value_str));
            }
            "scores.enabled" => {
                config.scores.get_or_insert_with(Default::default).enabled =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "scores.report-file" => {
                config.scores.get_or_insert_with(Default::default).report_file =
                    Some(value_str.to_string());
            }
            "heatmap.enabled" => {
                config.heatmap.get_or_insert_with(Default::default).enabled =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "heatmap.dpi" => {
                config.heatmap.get_or_insert_with(Default::default).dpi =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "heatmap.figure-size" => {
                config
                    .heatmap
                    .get_or_insert_with(Default::default)
                    .figure_size = Some(parse_value(key, value_str, "float")?);
            }
            "heatmap.color-scale" => {
                config
                    .heatmap
                    .get_or_insert_with(Default::default)
                    .color_scale = Some(parse_color_scale(key, value_str)?);
            }
            "heatmap.max-render-bytes" => {
                config
                    .heatmap
                    .get_or_insert_with(Default::default)
                    .max_render_bytes = Some(parse_value(key, value_str, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

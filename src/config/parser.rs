//! Parser for the crossbar description format.

use super::{BiasValues, CrossbarConfig};
use crate::devices::DeviceModel;
use crate::error::{CrossbarError, Result};

/// Line-oriented parser for crossbar descriptions.
pub struct Parser<'a> {
    input: &'a str,
}

impl<'a> Parser<'a> {
    /// Create a parser over the given text.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Parse the entire description.
    pub fn parse(&self) -> Result<CrossbarConfig> {
        let mut config = CrossbarConfig::default();
        let mut last_line = 0;

        for (idx, raw) in self.input.lines().enumerate() {
            let line = idx + 1;
            last_line = line;

            let text = strip_comment(raw).trim();
            if text.is_empty() {
                continue;
            }

            let mut tokens = text.split_whitespace();
            let directive = tokens.next().unwrap_or_default().to_lowercase();
            let args: Vec<&str> = tokens.collect();

            match directive.as_str() {
                ".size" => config.size = Some(parse_size(line, &args)?),
                ".device" => parse_device(line, &args, &mut config)?,
                ".lines" => parse_lines(line, &args, &mut config)?,
                ".bias" => parse_bias(line, &args, &mut config.bias)?,
                ".row" => config.rows.push(parse_row(line, &args)?),
                _ => {
                    return Err(CrossbarError::parse(
                        line,
                        format!("unknown directive '{}'", directive),
                    ))
                }
            }
        }

        if config.rows.is_empty() {
            return Err(CrossbarError::parse(
                last_line,
                "description has no .row lines",
            ));
        }

        Ok(config)
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find(|c: char| c == '#' || c == ';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_size(line: usize, args: &[&str]) -> Result<(usize, usize)> {
    match args {
        [rows, cols] => {
            let rows = rows
                .parse()
                .map_err(|_| CrossbarError::parse(line, format!("invalid row count '{}'", rows)))?;
            let cols = cols
                .parse()
                .map_err(|_| CrossbarError::parse(line, format!("invalid column count '{}'", cols)))?;
            Ok((rows, cols))
        }
        _ => Err(CrossbarError::parse(line, ".size expects <rows> <cols>")),
    }
}

fn parse_device(line: usize, args: &[&str], config: &mut CrossbarConfig) -> Result<()> {
    let (name, params) = args
        .split_first()
        .ok_or_else(|| CrossbarError::parse(line, ".device expects a model name"))?;
    config.model = name.parse::<DeviceModel>()?;

    for arg in params {
        let (key, value) = parse_assignment(line, arg)?;
        match key.as_str() {
            "temperature" | "t" => config.device.temperature = value,
            "frequency" | "f" => config.device.frequency = value,
            _ => return Err(unknown_key(line, ".device", &key)),
        }
    }
    Ok(())
}

fn parse_lines(line: usize, args: &[&str], config: &mut CrossbarConfig) -> Result<()> {
    for arg in args {
        let (key, value) = parse_assignment(line, arg)?;
        match key.as_str() {
            "r_wl" => config.lines.r_wl = value,
            "r_bl" => config.lines.r_bl = value,
            "r_in" => config.lines.r_in = value,
            "r_out" => config.lines.r_out = value,
            _ => return Err(unknown_key(line, ".lines", &key)),
        }
    }
    Ok(())
}

fn parse_bias(line: usize, args: &[&str], bias: &mut BiasValues) -> Result<()> {
    for arg in args {
        let (key, value) = parse_assignment(line, arg)?;
        match key.as_str() {
            "v_bl_in" => bias.v_bl_in = value,
            "v_bl_out" => bias.v_bl_out = value,
            "v_wl_out" => bias.v_wl_out = value,
            _ => return Err(unknown_key(line, ".bias", &key)),
        }
    }
    Ok(())
}

fn parse_row(line: usize, args: &[&str]) -> Result<Vec<f64>> {
    if args.is_empty() {
        return Err(CrossbarError::parse(line, ".row expects at least one conductance"));
    }
    args.iter().map(|text| parse_number(line, text)).collect()
}

fn parse_assignment(line: usize, arg: &str) -> Result<(String, f64)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| CrossbarError::parse(line, format!("expected key=value, got '{}'", arg)))?;
    Ok((key.to_lowercase(), parse_number(line, value)?))
}

fn parse_number(line: usize, text: &str) -> Result<f64> {
    parse_value(text).ok_or_else(|| CrossbarError::parse(line, format!("invalid number '{}'", text)))
}

fn unknown_key(line: usize, directive: &str, key: &str) -> CrossbarError {
    CrossbarError::parse(line, format!("unknown {} parameter '{}'", directive, key))
}

/// Parse a number with an optional SPICE unit suffix.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let last = text.chars().last()?;

    let multiplier = match last {
        'p' => 1e-12,
        'n' => 1e-9,
        'u' | 'µ' => 1e-6,
        'm' => 1e-3,
        'k' | 'K' => 1e3,
        'M' => 1e6,
        'G' => 1e9,
        _ => 1.0,
    };
    let digits = if multiplier != 1.0 {
        &text[..text.len() - last.len_utf8()]
    } else {
        text
    };

    digits.parse::<f64>().ok().map(|v| v * multiplier)
}

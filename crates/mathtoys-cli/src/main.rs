mod config;

use std::net::IpAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use mathtoys_core::{
    format_general, list_functions, lookup, resolve_params, sample_derivative, sample_function,
    ParamOverrides, RawNumber, ResolvedParams, Sample, SampleSeries, TangentLine, XRange,
};

#[derive(Parser)]
#[command(
    name = "mathtoys",
    version,
    about = "Function, derivative and tangent-line explorer"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported function families
    Functions,

    /// Sample a function and its derivative over an x-range
    Eval {
        /// Function id (see `mathtoys functions`)
        func: String,

        /// Parameter override, e.g. `-p a=2` (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,

        /// Left end of the x-range (default: the family's domain)
        #[arg(long, allow_negative_numbers = true)]
        x_min: Option<f64>,

        /// Right end of the x-range
        #[arg(long, allow_negative_numbers = true)]
        x_max: Option<f64>,

        /// Number of grid points (default: from config)
        #[arg(short = 'n', long)]
        points: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Tangent line to a function at x0
    Tangent {
        /// Function id
        func: String,

        /// Point of tangency
        #[arg(long, allow_negative_numbers = true)]
        x0: f64,

        /// Parameter override, e.g. `-p a=2` (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,
    },

    /// Show the config path and effective values
    Config,

    /// Run the HTTP JSON service
    Serve {
        /// Address to bind (default: from config)
        #[arg(long)]
        bind: Option<IpAddr>,

        /// Port to listen on (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn parse_param(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in '{s}'"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    Ok((name.to_string(), value))
}

fn to_overrides(params: Vec<(String, f64)>) -> ParamOverrides {
    params
        .into_iter()
        .map(|(name, value)| (name, RawNumber::Number(value)))
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Functions => cmd_functions(),
        Commands::Eval {
            func,
            params,
            x_min,
            x_max,
            points,
            json,
        } => cmd_eval(&func, to_overrides(params), x_min, x_max, points, json),
        Commands::Tangent { func, x0, params } => cmd_tangent(&func, x0, to_overrides(params)),
        Commands::Config => cmd_config(),
        Commands::Serve { bind, port } => cmd_serve(bind, port),
    }
}

fn cmd_functions() -> Result<()> {
    for spec in list_functions().iter() {
        println!("{:<10} {}", spec.id, spec.name);
        println!("{:<10} f(x)  = {}", "", spec.formula);
        println!("{:<10} f'(x) = {}", "", spec.derivative_formula);
        let params: Vec<String> = spec
            .params
            .iter()
            .map(|p| format!("{}={} [{}, {}]", p.id, p.default, p.min, p.max))
            .collect();
        println!("{:<10} params: {}", "", params.join(", "));
        println!(
            "{:<10} domain: [{}, {}]",
            "",
            format_general(spec.default_domain[0], 6),
            format_general(spec.default_domain[1], 6)
        );
        println!();
    }
    Ok(())
}

#[derive(Serialize)]
struct EvalOutput<'a> {
    func: &'a str,
    params: &'a ResolvedParams,
    func_data: SampleSeries,
    derivative_data: SampleSeries,
}

fn cmd_eval(
    func: &str,
    overrides: ParamOverrides,
    x_min: Option<f64>,
    x_max: Option<f64>,
    points: Option<usize>,
    json: bool,
) -> Result<()> {
    let sampling = config::load_config()?.sampling.with_points(points)?;
    let family = lookup(func)?;
    let params = resolve_params(func, Some(&overrides))?;
    let range = XRange::resolve(x_min, x_max, family.spec.default_domain, sampling.max_span)?;
    let points = sampling.num_points;
    debug!(func, %params, x_min = range.min(), x_max = range.max(), points, "sampling");

    let values = sample_function(func, range, points, &params)?;
    let slopes = sample_derivative(func, range, points, &params)?;

    if json {
        let out = EvalOutput {
            func,
            params: &params,
            func_data: values.rounded(sampling.precision),
            derivative_data: slopes.rounded(sampling.precision),
        };
        let text = serde_json::to_string_pretty(&out).context("serializing samples")?;
        println!("{text}");
        return Ok(());
    }

    println!("{} with {params}", family.spec.name);
    println!("{:>14} {:>14} {:>14}", "x", "f(x)", "f'(x)");
    println!("{}", "-".repeat(44));
    for ((x, y), (_, dy)) in values.points().zip(slopes.points()) {
        println!(
            "{:>14} {:>14} {:>14}",
            format_general(x, 6),
            render(y),
            render(dy)
        );
    }
    Ok(())
}

fn render(sample: Sample) -> String {
    match sample {
        Sample::Defined(v) => format_general(v, 6),
        Sample::Undefined => "-".into(),
    }
}

fn cmd_tangent(func: &str, x0: f64, overrides: ParamOverrides) -> Result<()> {
    let params = resolve_params(func, Some(&overrides))?;
    let line = TangentLine::at(func, x0, &params)
        .with_context(|| format!("no tangent to {func} at x0 = {x0}"))?;

    println!("Point:    ({}, {})", format_general(line.x0, 6), format_general(line.y0, 6));
    println!("Slope:    {}", format_general(line.slope, 6));
    println!("Tangent:  {}", line.equation());
    Ok(())
}

fn cmd_config() -> Result<()> {
    let cfg = config::load_config()?;
    println!("Config: {}", config::show_config_path());
    println!();
    println!("[server]");
    println!("  bind = {}", cfg.server.bind);
    println!("  port = {}", cfg.server.port);
    println!();
    println!("[sampling]");
    println!("  num_points = {}", cfg.sampling.num_points);
    println!("  max_span = {}", cfg.sampling.max_span);
    println!("  precision = {}", cfg.sampling.precision);
    Ok(())
}

fn cmd_serve(bind: Option<IpAddr>, port: Option<u16>) -> Result<()> {
    let mut cfg = config::load_config()?;
    if let Some(bind) = bind {
        cfg.server.bind = bind;
    }
    if let Some(port) = port {
        cfg.server.port = port;
    }

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(mathtoys_web::run_server(
        cfg.server.addr(),
        cfg.sampling.to_settings(),
    ))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("a=2"), Ok(("a".to_string(), 2.0)));
        assert_eq!(parse_param(" n = -0.5 "), Ok(("n".to_string(), -0.5)));
        assert!(parse_param("a").is_err());
        assert!(parse_param("=3").is_err());
        assert!(parse_param("a=two").is_err());
    }

    #[test]
    fn test_eval_args() {
        let cli = Cli::try_parse_from([
            "mathtoys", "eval", "sin", "-p", "a=2", "-p", "b=-1", "--x-min", "-3", "--x-max",
            "3", "-n", "7", "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Eval {
                func,
                params,
                x_min,
                x_max,
                points,
                json,
            } => {
                assert_eq!(func, "sin");
                assert_eq!(params, vec![("a".into(), 2.0), ("b".into(), -1.0)]);
                assert_eq!(x_min, Some(-3.0));
                assert_eq!(x_max, Some(3.0));
                assert_eq!(points, Some(7));
                assert!(json);
            }
            _ => panic!("expected eval"),
        }
    }

    #[test]
    fn test_tangent_args() {
        let cli = Cli::try_parse_from(["mathtoys", "tangent", "ln", "--x0", "-0.5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Tangent { ref func, x0, .. } if func == "ln" && x0 == -0.5
        ));
    }

    #[test]
    fn test_overrides_feed_resolver() {
        let overrides = to_overrides(vec![("a".into(), 3.0)]);
        let params = resolve_params("linear", Some(&overrides)).unwrap();
        assert_eq!(params.get("a"), Some(3.0));
        assert_eq!(params.get("b"), Some(0.0));
    }

    #[test]
    fn test_render_undefined() {
        assert_eq!(render(Sample::Undefined), "-");
        assert_eq!(render(Sample::Defined(0.5)), "0.5");
    }
}

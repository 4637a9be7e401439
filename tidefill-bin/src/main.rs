// main.rs      tidefill command
//
// Copyright (c) 2024  tidefill developers
//
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

mod image;

use clap::{App, Arg, ArgMatches};
use pix::rgb::SRgba8;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tidefill::{flood_fill, FillConfig, Order, Picker, Point};

/// Crate version
const VERSION: &str = std::env!("CARGO_PKG_VERSION");

/// Command-line argument error
#[derive(Debug)]
struct ArgError(String);

impl fmt::Display for ArgError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.0)
    }
}

impl Error for ArgError {}

/// Main entry point
fn main() {
    env_logger::builder().format_timestamp(None).init();
    let mut err = StandardStream::stderr(ColorChoice::Auto);
    let matches = create_app().get_matches();
    if let Err(e) = run(&mut err, &matches) {
        let mut red = ColorSpec::new();
        red.set_fg(Some(Color::Red)).set_intense(true);
        let _ = err.set_color(&red);
        let _ = writeln!(err, "Error: {}", e);
        let _ = err.reset();
        std::process::exit(1);
    }
}

/// Create clap App
fn create_app() -> App<'static, 'static> {
    App::new("tidefill")
        .version(VERSION)
        .about("Animated flood fill")
        .arg(
            Arg::with_name("input")
                .long("input")
                .value_name("PATH")
                .required(true)
                .help("Input PNG image"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .value_name("PATH")
                .required(true)
                .help("Output file (.gif for animation, otherwise PNG)"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("X,Y")
                .default_value("0,0")
                .help("Seed pixel coordinates"),
        )
        .arg(
            Arg::with_name("tolerance")
                .long("tolerance")
                .value_name("DIST")
                .default_value("0.1")
                .help("Color tolerance"),
        )
        .arg(
            Arg::with_name("frame-freq")
                .long("frame-freq")
                .value_name("PIXELS")
                .default_value("1000")
                .help("Filled pixels between frames (0: final frame only)"),
        )
        .arg(
            Arg::with_name("max-frames")
                .long("max-frames")
                .value_name("N")
                .help("Maximum number of intermediate frames"),
        )
        .arg(
            Arg::with_name("algo")
                .long("algo")
                .possible_values(&["bfs", "dfs"])
                .default_value("bfs")
                .help("Fill algorithm"),
        )
        .arg(
            Arg::with_name("picker")
                .long("picker")
                .possible_values(&["solid", "stripe", "quarter", "border"])
                .default_value("solid")
                .help("Color picker"),
        )
        .arg(color_arg("color", "255,0,0,255", "Fill color"))
        .arg(color_arg("color1", "255,0,0,255", "First stripe color"))
        .arg(color_arg("color2", "0,0,255,255", "Second stripe color"))
        .arg(color_arg("border-color", "0,0,0,255", "Border color"))
        .arg(
            Arg::with_name("stripe-width")
                .long("stripe-width")
                .value_name("PIXELS")
                .default_value("10")
                .help("Stripe width"),
        )
        .arg(
            Arg::with_name("bright")
                .long("bright")
                .value_name("N")
                .default_value("40")
                .allow_hyphen_values(true)
                .help("Quarter brightness step (out of 255)"),
        )
        .arg(
            Arg::with_name("center")
                .long("center")
                .value_name("X,Y")
                .help("Quarter center (default: raster midpoint)"),
        )
        .arg(
            Arg::with_name("border-width")
                .long("border-width")
                .value_name("PIXELS")
                .default_value("3")
                .help("Border width"),
        )
        .arg(
            Arg::with_name("delay")
                .long("delay")
                .value_name("CS")
                .default_value("4")
                .help("GIF frame delay, in centiseconds"),
        )
}

/// Create a color argument
fn color_arg(
    name: &'static str,
    default: &'static str,
    help: &'static str,
) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(name)
        .value_name("R,G,B[,A]")
        .default_value(default)
        .help(help)
}

/// Parse a required value
fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, ArgError> {
    let v = matches.value_of(name).unwrap_or_default();
    v.trim()
        .parse()
        .map_err(|_| ArgError(format!("invalid --{}: {:?}", name, v)))
}

/// Parse comma-separated numbers
fn numbers<T: FromStr>(v: &str) -> Option<Vec<T>> {
    v.split(',').map(|n| n.trim().parse().ok()).collect()
}

/// Parse a point argument
fn point(matches: &ArgMatches, name: &str) -> Result<Point, ArgError> {
    let v = matches.value_of(name).unwrap_or_default();
    match numbers::<i32>(v).as_deref() {
        Some([x, y]) => Ok(Point::new(*x, *y)),
        _ => Err(ArgError(format!("invalid --{}: {:?}", name, v))),
    }
}

/// Parse a color argument
fn color(matches: &ArgMatches, name: &str) -> Result<SRgba8, ArgError> {
    let v = matches.value_of(name).unwrap_or_default();
    match numbers::<u8>(v).as_deref() {
        Some([r, g, b]) => Ok(SRgba8::new(*r, *g, *b, 255)),
        Some([r, g, b, a]) => Ok(SRgba8::new(*r, *g, *b, *a)),
        _ => Err(ArgError(format!("invalid --{}: {:?}", name, v))),
    }
}

/// Build a picker from arguments
fn picker(matches: &ArgMatches) -> Result<Picker, ArgError> {
    Ok(match matches.value_of("picker") {
        Some("stripe") => Picker::stripe(
            color(matches, "color1")?,
            color(matches, "color2")?,
            value(matches, "stripe-width")?,
        ),
        Some("quarter") => {
            let center = if matches.is_present("center") {
                point(matches, "center")?
            } else {
                Point::default()
            };
            Picker::Quarter {
                color: color(matches, "color")?,
                brightness: value(matches, "bright")?,
                center,
            }
        }
        Some("border") => Picker::border(
            color(matches, "color")?,
            color(matches, "border-color")?,
            value(matches, "border-width")?,
        ),
        _ => Picker::Solid(color(matches, "color")?),
    })
}

/// Build a fill configuration from arguments
fn fill_config(matches: &ArgMatches) -> Result<FillConfig, ArgError> {
    let order = match matches.value_of("algo") {
        Some("dfs") => Order::DepthFirst,
        _ => Order::BreadthFirst,
    };
    let max_frames = if matches.is_present("max-frames") {
        Some(value(matches, "max-frames")?)
    } else {
        None
    };
    Ok(FillConfig::default()
        .with_seed(point(matches, "seed")?)
        .with_tolerance(value(matches, "tolerance")?)
        .with_frame_freq(value(matches, "frame-freq")?)
        .with_max_frames(max_frames)
        .with_order(order)
        .with_picker(picker(matches)?))
}

/// Write a status line
fn status(err: &mut StandardStream, msg: &str) -> Result<(), Box<dyn Error>> {
    let mut cyan = ColorSpec::new();
    cyan.set_fg(Some(Color::Cyan)).set_intense(true);
    err.set_color(&cyan)?;
    writeln!(err, "{}", msg)?;
    err.reset()?;
    Ok(())
}

/// Run a fill
fn run(
    err: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let config = fill_config(matches)?;
    let delay: u16 = value(matches, "delay")?;
    let input = Path::new(matches.value_of_os("input").unwrap_or_default());
    let output = Path::new(matches.value_of_os("output").unwrap_or_default());
    let raster = image::load(input)?;
    status(
        err,
        &format!(
            "Loaded {}x{} image from {}",
            raster.width(),
            raster.height(),
            input.display()
        ),
    )?;
    let seed = config.seed();
    status(
        err,
        &format!(
            "Running flood fill ({}) from ({},{})...",
            config.order(),
            seed.x,
            seed.y
        ),
    )?;
    let animation = flood_fill(&raster, &config)?;
    status(
        err,
        &format!("Fill complete: {} frames captured.", animation.len()),
    )?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let is_gif = output
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("gif"));
    if is_gif {
        animation.write_gif(output, delay)?;
        status(err, &format!("Wrote animated GIF to {}", output.display()))?;
    } else {
        image::save(output, animation.final_frame()?)?;
        status(err, &format!("Wrote final PNG to {}", output.display()))?;
    }
    info!("done: {:?}", output);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn matches(args: &[&str]) -> ArgMatches<'static> {
        let mut argv = vec!["tidefill", "--input", "in.png", "--output", "out.gif"];
        argv.extend_from_slice(args);
        create_app().get_matches_from_safe(argv).unwrap()
    }

    #[test]
    fn defaults() {
        let cfg = fill_config(&matches(&[])).unwrap();
        assert_eq!(cfg, FillConfig::default());
    }

    #[test]
    fn options() {
        let m = matches(&[
            "--seed", "3,4", "--algo", "dfs", "--frame-freq", "0",
            "--max-frames", "7", "--picker", "stripe", "--color1", "1,2,3",
            "--stripe-width", "5",
        ]);
        let cfg = fill_config(&m).unwrap();
        assert_eq!(cfg.seed(), Point::new(3, 4));
        assert_eq!(cfg.order(), Order::DepthFirst);
        assert_eq!(cfg.frame_freq(), 0);
        assert_eq!(cfg.max_frames(), Some(7));
        assert_eq!(
            cfg.picker(),
            &Picker::stripe(
                SRgba8::new(1, 2, 3, 255),
                SRgba8::new(0, 0, 255, 255),
                5
            )
        );
    }

    #[test]
    fn quarter() {
        let m = matches(&[
            "--picker", "quarter", "--bright", "-20", "--center", "9,8",
        ]);
        let cfg = fill_config(&m).unwrap();
        assert_eq!(
            cfg.picker(),
            &Picker::Quarter {
                color: SRgba8::new(255, 0, 0, 255),
                brightness: -20,
                center: Point::new(9, 8),
            }
        );
    }

    #[test]
    fn bad_values() {
        assert!(fill_config(&matches(&["--seed", "1"])).is_err());
        assert!(fill_config(&matches(&["--color", "1,2,300"])).is_err());
        assert!(fill_config(&matches(&["--tolerance", "x"])).is_err());
    }
}

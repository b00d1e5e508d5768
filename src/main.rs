extern crate clap;
extern crate fractalview;
extern crate num;
extern crate num_cpus;
extern crate serde_json;

use clap::{App, Arg, ArgMatches};
use num::Complex;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use fractalview::{Axis, FractalKind, Palette, PaletteConfig, RenderParams, Viewport, DEFAULT_CONFIG};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_zoom(s: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(z) if z > 0.0 => Ok(()),
        Ok(_) => Err("Zoom must be strictly positive".to_string()),
        Err(_) => Err("Could not parse zoom".to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const KIND: &str = "kind";
const CONSTANT: &str = "constant";
const CENTER: &str = "center";
const ZOOM: &str = "zoom";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const PALETTE: &str = "palette";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("fractalview")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Escape-time fractal renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("512x512")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(KIND)
                .required(false)
                .long(KIND)
                .short("k")
                .takes_value(true)
                .default_value("mandelbrot")
                .possible_values(&["mandelbrot", "julia"])
                .help("Which fractal to render"),
        )
        .arg(
            Arg::with_name(CONSTANT)
                .required(false)
                .long(CONSTANT)
                .short("c")
                .takes_value(true)
                .default_value("-0.3,-0.63")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse Julia constant"))
                .help("The c constant for Julia sets"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .takes_value(true)
                .default_value("0,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse view center"))
                .help("Center of the view on the complex plane"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("1")
                .validator(|s| validate_zoom(&s))
                .help("Magnification; 1 shows the base +/-1.5 window"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("256")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 100000",
                    )
                })
                .help("Iteration limit per grid point"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .required(false)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .help("Palette configuration file (JSON)"),
        )
        .get_matches()
}

fn load_config(path: &str) -> Result<PaletteConfig, String> {
    let file = File::open(path).map_err(|e| format!("{}: {}", path, e))?;
    serde_json::from_reader(file).map_err(|e| format!("{}: {}", path, e))
}

fn main() {
    let matches = args();
    let (width, height): (usize, usize) =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let center =
        parse_complex(matches.value_of(CENTER).unwrap()).expect("Error parsing view center");
    let zoom = f64::from_str(matches.value_of(ZOOM).unwrap()).expect("Error parsing zoom");
    let limit = usize::from_str(matches.value_of(ITERATIONS).unwrap())
        .expect("Error parsing iteration count");
    let threads =
        usize::from_str(matches.value_of(THREADS).unwrap()).expect("Error parsing thread count");

    let kind = match matches.value_of(KIND).unwrap() {
        "julia" => FractalKind::Julia(
            parse_complex(matches.value_of(CONSTANT).unwrap())
                .expect("Error parsing Julia constant"),
        ),
        _ => FractalKind::Mandelbrot,
    };

    let config = match matches.value_of(PALETTE) {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Palette failure: {}", e);
                std::process::exit(1);
            }
        },
        None => DEFAULT_CONFIG,
    };

    let viewport = Viewport::new(center, zoom).expect("Error parsing viewport");
    let params = RenderParams {
        kind,
        width,
        height,
        limit,
    };

    match fractalview::compute(&viewport.rect(), &params, threads) {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(field) => {
            let counts = field.count_field().normalized(0.0, 255.0, Axis::Global);
            let palette = Palette::build(&config);
            let image = fractalview::apply(&counts, &palette);
            if let Err(e) = fractalview::save(&image, Path::new(matches.value_of(OUTPUT).unwrap()))
            {
                eprintln!("Write failure: {}", e);
                std::process::exit(1);
            }
        }
    }
}

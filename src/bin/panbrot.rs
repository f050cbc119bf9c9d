extern crate clap;
extern crate image;
extern crate num;
extern crate num_cpus;
extern crate panbrot;

use clap::{App, Arg, ArgMatches};
use num::Complex;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use panbrot::palette::preset;
use panbrot::{FrameRenderer, FrameSpec, MandelbrotEngine};

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

fn validate_positive_real(s: &str, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(v) if v > 0.0 && v.is_finite() => Ok(()),
        _ => Err(err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const SCALE: &str = "scale";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const PALETTE: &str = "palette";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("panbrot")
        .version("0.1.0")
        .about("Mandelbrot frame renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output image file (format from extension, e.g. .png)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.5,0.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Complex point at the center of the image"),
        )
        .arg(
            Arg::with_name(SCALE)
                .required(false)
                .long(SCALE)
                .takes_value(true)
                .default_value("0.005")
                .validator(|s| validate_positive_real(&s, "Scale must be a positive real"))
                .help("Complex-plane distance between adjacent pixels"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("500")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum escape-test iterations per pixel"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of worker threads (default: all CPUs)"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .required(false)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .default_value("default")
                .possible_values(&["default", "forest", "awful"])
                .help("Named color palette"),
        )
        .get_matches()
}

/// Unpack the renderer's 0x00RRGGBB words into the byte-per-channel
/// layout the image encoders want.
fn to_rgb_bytes(pixels: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(pixels.len() * 3);
    for &p in pixels {
        bytes.push(((p >> 16) & 0xFF) as u8);
        bytes.push(((p >> 8) & 0xFF) as u8);
        bytes.push((p & 0xFF) as u8);
    }
    bytes
}

fn write_image(
    outfile: &str,
    pixels: &[u32],
    bounds: (usize, usize),
) -> Result<(), std::io::Error> {
    image::save_buffer(
        Path::new(outfile),
        &to_rgb_bytes(pixels),
        bounds.0 as u32,
        bounds.1 as u32,
        image::ColorType::RGB(8),
    )
}

fn main() {
    let matches = args();
    let image_size =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let center =
        parse_complex(matches.value_of(CENTER).unwrap()).expect("Error parsing center point");
    let scale = f64::from_str(matches.value_of(SCALE).unwrap()).expect("Error parsing scale");
    let iterations = u32::from_str(matches.value_of(ITERATIONS).unwrap())
        .expect("Could not parse iteration count");
    let threads = match matches.value_of(THREADS) {
        Some(t) => usize::from_str(t).expect("Could not parse thread count"),
        None => num_cpus::get(),
    };
    let palette = preset(matches.value_of(PALETTE).unwrap()).expect("Unknown palette");

    let spec = match FrameSpec::new(
        image_size.0,
        image_size.1,
        center,
        scale,
        iterations,
        Arc::new(palette),
    ) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("Bad frame: {}", e);
            std::process::exit(1);
        }
    };

    let mut renderer = FrameRenderer::with_threads(MandelbrotEngine, threads);
    match renderer.render(&spec) {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(pixels) => {
            write_image(matches.value_of(OUTPUT).unwrap(), &pixels, image_size)
                .expect("Could not write output image");
        }
    }
}

use std::path::PathBuf;

use molscope::{options::Options, Viewer};

const USAGE: &str = "Usage: molscope [--options <file.toml>] [structure.pdb]";

struct Args {
    structure: Option<PathBuf>,
    options: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        structure: None,
        options: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--options" => {
                let path = iter.next().ok_or("--options needs a file path")?;
                args.options = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(USAGE.to_owned()),
            _ if args.structure.is_none() => args.structure = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument '{arg}'\n{USAGE}")),
        }
    }
    Ok(args)
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            log::error!("{msg}");
            std::process::exit(2);
        }
    };

    let options = match args.options.as_deref().map(Options::load).transpose() {
        Ok(options) => options.unwrap_or_default(),
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let mut builder = Viewer::builder().with_options(options);
    if let Some(path) = args.structure {
        builder = builder.with_path(path);
    }

    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

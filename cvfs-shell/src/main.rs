mod cli;
mod command;
mod shell;

use std::io::{self, BufRead, Write};
use std::process;

use clap::Parser;
use cvfs::CVFS;

use crate::cli::Cli;
use crate::shell::Flow;

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut fs = match CVFS::builder()
        .with_max_inodes(cli.max_inodes)
        .with_max_open_files(cli.max_open_files)
        .with_max_file_size(cli.max_file_size)
        .build()
    {
        Ok(fs) => fs,
        Err(err) => {
            eprintln!("cvfs: cannot boot with the requested capacities: {}", err);
            process::exit(2);
        }
    };
    log::info!(
        "inodes={} descriptors={} file_size={}",
        cli.max_inodes,
        cli.max_open_files,
        cli.max_file_size
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        write!(out, "\nCVFS : > ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        match command::parse(&line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                if shell::execute(&mut fs, command, &mut input, &mut out)? == Flow::Exit {
                    break;
                }
            }
            Err(err) => {
                writeln!(out, "Error : {}", err)?;
                writeln!(out, "Please refer help option to get more information")?;
            }
        }
    }
    Ok(())
}

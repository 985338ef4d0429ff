use crate::command::Command;
use cvfs::{CVFSError, FileStat, Permission, CVFS};
use std::io::{self, BufRead, Write};

#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue,
    Exit,
}

const HELP: &str = "\
man     : Display the manual page of a command
ls      : List all files with details
clear   : Clear the terminal
creat   : Create a new file
write   : Write data into a file
read    : Read data from a file
stat    : Display information about a file
fstat   : Display information about an open descriptor
unlink  : Delete a file
exit    : Leave the shell";

fn manual(name: &str) -> Option<&'static str> {
    let page = match name {
        "ls" => "About        : List the names of all files\nUsage        : ls",
        "man" => {
            "About        : Display a manual page\n\
             Usage        : man command_name\n\
             command_name : Name of the command"
        }
        "exit" => "About        : Terminate the shell\nUsage        : exit",
        "clear" => "About        : Clear the terminal\nUsage        : clear",
        "creat" => {
            "About        : Create a new file and open it\n\
             Usage        : creat file_name permission\n\
             permission   : 1 = read, 2 = write, 3 = read and write"
        }
        "write" => {
            "About        : Append data to an open file\n\
             Usage        : write file_descriptor\n\
             The data is read from the next line."
        }
        "read" => {
            "About        : Read data from an open file\n\
             Usage        : read file_descriptor size"
        }
        "stat" => "About        : Display file information\nUsage        : stat file_name",
        "fstat" => {
            "About        : Display file information by descriptor\n\
             Usage        : fstat file_descriptor"
        }
        "unlink" => "About        : Delete a file\nUsage        : unlink file_name",
        _ => return None,
    };
    Some(page)
}

fn render_stat(out: &mut impl Write, stat: &FileStat) -> io::Result<()> {
    let mut perm = String::new();
    perm.push(if stat.permission.contains(Permission::Read) { 'r' } else { '-' });
    perm.push(if stat.permission.contains(Permission::Write) { 'w' } else { '-' });

    writeln!(out, "File name       : {}", stat.name)?;
    writeln!(out, "Inode number    : {}", stat.inode_number)?;
    writeln!(out, "File type       : {:?}", stat.file_type)?;
    writeln!(out, "Size limit      : {}", stat.size_limit)?;
    writeln!(out, "Actual size     : {}", stat.actual_size)?;
    writeln!(out, "Reference count : {}", stat.reference_count)?;
    writeln!(out, "Permission      : {}", perm)
}

fn render_error(out: &mut impl Write, err: CVFSError) -> io::Result<()> {
    writeln!(out, "Error : {}", err)
}

/// Runs one parsed command against the file system. `input` supplies the data
/// line that follows a `write`.
pub fn execute(
    fs: &mut CVFS,
    command: Command,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<Flow> {
    match command {
        Command::Exit => {
            writeln!(out, "Deallocating all the allocated resources")?;
            return Ok(Flow::Exit);
        }
        Command::Ls => {
            for entry in fs.list_files() {
                writeln!(out, "{}\t{}\t{}", entry.inode_number, entry.name, entry.actual_size)?;
            }
        }
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Clear => write!(out, "\x1B[2J\x1B[1;1H")?,
        Command::Man(name) => match manual(&name) {
            Some(page) => writeln!(out, "{}", page)?,
            None => writeln!(out, "No manual entry for {}", name)?,
        },
        Command::Create { name, permission } => {
            writeln!(out, "Total number of inodes remaining : {}", fs.free_inodes())?;
            match fs.create_file(&name, permission) {
                Ok(fd) => writeln!(out, "File created with descriptor {}", fd)?,
                Err(err) => render_error(out, err)?,
            }
        }
        Command::Write(fd) => {
            writeln!(out, "Enter the data that you want to write :")?;
            out.flush()?;
            let mut line = String::new();
            input.read_line(&mut line)?;
            let data = line.trim_end_matches(&['\r', '\n'][..]);
            match fs.write_file(fd, data.as_bytes(), data.len()) {
                Ok(n) => writeln!(out, "{} bytes written", n)?,
                Err(err) => render_error(out, err)?,
            }
        }
        // No file holds more than the size limit, so a larger request can
        // never be satisfied and is refused before allocating for it.
        Command::Read { size, .. } if size > fs.max_file_size() => {
            render_error(out, CVFSError::InsufficientData)?
        }
        Command::Read { fd, size } => {
            let mut buf = vec![0; size];
            match fs.read_file(fd, &mut buf, size) {
                Ok(n) => writeln!(out, "Data from file is : {}", String::from_utf8_lossy(&buf[..n]))?,
                Err(err) => render_error(out, err)?,
            }
        }
        Command::Stat(name) => match fs.stat(&name) {
            Ok(stat) => render_stat(out, &stat)?,
            Err(err) => render_error(out, err)?,
        },
        Command::Fstat(fd) => match fs.fstat(fd) {
            Ok(stat) => render_stat(out, &stat)?,
            Err(err) => render_error(out, err)?,
        },
        Command::Unlink(name) => match fs.unlink_file(&name) {
            Ok(()) => writeln!(out, "File deleted")?,
            Err(err) => render_error(out, err)?,
        },
    }
    Ok(Flow::Continue)
}

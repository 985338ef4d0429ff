use clap::Parser;

#[derive(Parser)]
#[command(name = "cvfs")]
#[command(about = "Interactive shell over an in-memory virtual file system")]
#[command(version)]
pub struct Cli {
    /// Number of inodes, the maximum number of files
    #[arg(long, default_value_t = cvfs::MAX_INODES)]
    pub max_inodes: usize,

    /// Descriptor table size, including the three reserved slots
    #[arg(long, default_value_t = cvfs::MAX_OPEN_FILES)]
    pub max_open_files: usize,

    /// Size limit of every file in bytes
    #[arg(long, default_value_t = cvfs::MAX_FILE_SIZE)]
    pub max_file_size: usize,
}

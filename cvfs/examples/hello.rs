use cvfs::{CVFSError, CVFS};

pub fn main() {
    // Boot a file system with the default capacities and create one file.
    let mut fs = CVFS::new();
    let fd = fs.create_file("hello.txt", 3).expect("should create");

    fs.write_file(fd, b"hello, world", 12).unwrap();
    let mut buf = [0; 12];
    fs.read_file(fd, &mut buf, 12).unwrap();
    println!("{}", String::from_utf8_lossy(&buf));

    for entry in fs.list_files() {
        println!("{}\t{}\t{}", entry.inode_number, entry.name, entry.actual_size);
    }

    assert_eq!(fs.create_file("hello.txt", 1), Err(CVFSError::FileAlreadyExists));
    fs.unlink_file("hello.txt").unwrap();
    println!("{} of {} inodes free", fs.free_inodes(), fs.total_inodes());
}

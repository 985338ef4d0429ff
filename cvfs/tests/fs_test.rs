use cvfs::{CVFSError, FileEntry, FileType, OpenFile, CVFS};
use quickcheck::{Arbitrary, Gen, QuickCheck};

fn regular_count(fs: &CVFS) -> usize {
    fs.inodes()
        .filter(|node| node.file_type() == FileType::Regular)
        .count()
}

fn accounting_holds(fs: &CVFS) -> bool {
    fs.free_inodes() + regular_count(fs) == fs.total_inodes()
        && fs.inodes().all(|node| node.has_buffer() == node.is_regular())
}

#[test]
fn boot_reports_five_free_inodes() {
    let fs = CVFS::new();

    assert_eq!(fs.free_inodes(), 5);
    assert_eq!(fs.inodes().count(), 5);
    assert!(fs.inodes().all(|node| node.file_type() == FileType::Free));
}

#[test]
fn create_write_read_and_unlink_a_file() {
    let mut fs = CVFS::new();

    let fd = fs.create_file("a.txt", 3).unwrap();
    assert!(fd >= 3);
    assert_eq!(fs.free_inodes(), 4);

    assert_eq!(fs.create_file("a.txt", 3), Err(CVFSError::FileAlreadyExists));
    assert_eq!(fs.free_inodes(), 4);

    assert_eq!(fs.write_file(fd, b"hello", 5), Ok(5));
    assert_eq!(fs.stat("a.txt").unwrap().actual_size, 5);

    let mut buf = [0; 5];
    assert_eq!(fs.read_file(fd, &mut buf, 5), Ok(5));
    assert_eq!(&buf, b"hello");

    assert_eq!(fs.unlink_file("a.txt"), Ok(()));
    assert_eq!(fs.free_inodes(), 5);
    assert!(!fs.file_exists("a.txt"));
    assert!(fs.descriptor(fd).is_none());
    assert!(accounting_holds(&fs));
}

#[test]
fn read_only_file_refuses_writes() {
    let mut fs = CVFS::new();
    fs.create_file("a.txt", 3).unwrap();
    let fd = fs.create_file("b.txt", 1).unwrap();

    assert_eq!(fs.write_file(fd, b"x", 1), Err(CVFSError::PermissionDenied));
    assert_eq!(fs.fstat(fd).unwrap().actual_size, 0);
}

#[test]
fn sixth_file_finds_no_inode() {
    let mut fs = CVFS::new();
    for name in &["1", "2", "3", "4", "5"] {
        fs.create_file(name, 3).unwrap();
    }
    assert_eq!(fs.free_inodes(), 0);
    let before: Vec<FileEntry> = fs.list_files().collect();

    assert_eq!(fs.create_file("6", 3), Err(CVFSError::NoFreeInodes));
    assert_eq!(fs.list_files().collect::<Vec<_>>(), before);
    assert!(accounting_holds(&fs));
}

#[test]
fn write_that_overflows_the_file_is_refused() {
    let mut fs = CVFS::new();
    let fd = fs.create_file("a.txt", 3).unwrap();
    fs.write_file(fd, &[b'a'; 45], 45).unwrap();

    assert_eq!(
        fs.write_file(fd, &[b'b'; 10], 10),
        Err(CVFSError::InsufficientSpace)
    );
    assert_eq!(fs.descriptor(fd).unwrap().write_offset(), 45);
    assert_eq!(fs.stat("a.txt").unwrap().actual_size, 45);
}

#[test]
fn listing_reports_inode_name_and_size() {
    let mut fs = CVFS::new();
    let a = fs.create_file("a", 3).unwrap();
    fs.create_file("b", 1).unwrap();
    fs.write_file(a, b"abc", 3).unwrap();

    let listing: Vec<(usize, String, usize)> = fs
        .list_files()
        .map(|entry| (entry.inode_number, entry.name, entry.actual_size))
        .collect();
    assert_eq!(
        listing,
        vec![(1, "a".to_string(), 3), (2, "b".to_string(), 0)]
    );
}

#[derive(Clone, Debug)]
enum Op {
    Create(u8, u8),
    Write(usize, Vec<u8>),
    Read(usize, usize),
    Unlink(u8),
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        // A handful of names so creates collide with existing files.
        let name = u8::arbitrary(g) % 7;
        match u8::arbitrary(g) % 4 {
            0 => Op::Create(name, u8::arbitrary(g) % 5),
            1 => Op::Write(usize::arbitrary(g) % 22, Vec::<u8>::arbitrary(g)),
            2 => Op::Read(usize::arbitrary(g) % 22, usize::arbitrary(g) % 60),
            _ => Op::Unlink(name),
        }
    }
}

type Snapshot = (
    usize,
    Vec<(usize, FileType, usize, bool)>,
    Vec<Option<OpenFile>>,
);

fn snapshot(fs: &CVFS) -> Snapshot {
    (
        fs.free_inodes(),
        fs.inodes()
            .map(|node| {
                (
                    node.number(),
                    node.file_type(),
                    node.actual_size(),
                    node.has_buffer(),
                )
            })
            .collect(),
        (0..fs.max_open_files())
            .map(|fd| fs.descriptor(fd).cloned())
            .collect(),
    )
}

fn apply(fs: &mut CVFS, op: &Op) -> Result<(), CVFSError> {
    match op {
        Op::Create(name, perm) => fs.create_file(&format!("f{}", name), *perm).map(|_| ()),
        Op::Write(fd, data) => fs.write_file(*fd, data, data.len()).map(|_| ()),
        Op::Read(fd, size) => {
            let mut buf = vec![0; *size];
            fs.read_file(*fd, &mut buf, *size).map(|_| ())
        }
        Op::Unlink(name) => fs.unlink_file(&format!("f{}", name)),
    }
}

#[test]
fn prop_failed_operations_change_nothing_and_accounting_holds() {
    fn property(ops: Vec<Op>) -> bool {
        let mut fs = CVFS::new();
        for op in &ops {
            let before = snapshot(&fs);
            if apply(&mut fs, op).is_err() && snapshot(&fs) != before {
                return false;
            }
            if !accounting_holds(&fs) {
                return false;
            }
        }
        true
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(property as fn(Vec<Op>) -> bool);
}

#[test]
fn prop_offsets_never_pass_the_size_limit() {
    fn property(ops: Vec<Op>) -> bool {
        let mut fs = CVFS::new();
        for op in &ops {
            let _ = apply(&mut fs, op);
        }
        (0..fs.max_open_files())
            .filter_map(|fd| fs.descriptor(fd))
            .all(|file| {
                let node = fs.inode(file.inode()).unwrap();
                node.actual_size() <= node.size_limit()
                    && file.write_offset() <= node.size_limit()
                    && file.read_offset() <= node.size_limit()
            })
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(property as fn(Vec<Op>) -> bool);
}

use anyhow::Result;
use min_git::Repository;
use min_git::index::ops;

/// `ls-files [--debug]`: prints every staged path, one per line, as
/// `"<mode:06o> <oid> <stage>\t<path>"`; `--debug` additionally prints the
/// stat-cache fields recorded for each entry.
pub fn run(repo: &Repository, debug: bool) -> Result<()> {
    let index = ops::load(repo)?;
    for entry in index.entries() {
        println!(
            "{:06o} {} {}\t{}",
            entry.mode, entry.oid, entry.stage, entry.path
        );
        if debug {
            println!("  ctime: {}:{}", entry.ctime_sec, entry.ctime_nsec);
            println!("  mtime: {}:{}", entry.mtime_sec, entry.mtime_nsec);
            println!("  dev: {}\tino: {}", entry.dev, entry.ino);
            println!("  uid: {}\tgid: {}", entry.uid, entry.gid);
            println!(
                "  size: {}\tflags: {:x}",
                entry.file_size,
                entry.flags()
            );
        }
    }
    Ok(())
}

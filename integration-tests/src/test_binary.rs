use std::{error::Error, fs::File, io::Write, path::Path, time::Duration};

fn write_args(workdir: &Path) -> std::io::Result<()> {
    let mut file = File::create(workdir.join("args"))?;
    for arg in std::env::args().skip(1) {
        file.write_all(arg.as_bytes())?;
        file.write_all(b"\n")?;
    }
    Ok(())
}

fn read_number<T: std::str::FromStr>(workdir: &Path, name: &str) -> Result<T, Box<dyn Error>>
where
    T::Err: Error + 'static,
{
    let value = std::fs::read_to_string(workdir.join(name))?.trim().parse()?;
    Ok(value)
}

fn copy_stdout(workdir: &Path) -> std::io::Result<()> {
    let mut file = File::open(workdir.join("stdout"))?;
    std::io::copy(&mut file, &mut std::io::stdout())?;
    Ok(())
}

fn copy_stderr(workdir: &Path) -> std::io::Result<()> {
    let mut file = File::open(workdir.join("stderr"))?;
    std::io::copy(&mut file, &mut std::io::stderr())?;
    Ok(())
}

/// Stands in for the sync program: records its arguments, replays canned
/// output, optionally lingers, then exits with the configured status.
pub fn test_binary_main() {
    let workdir = std::env::current_exe()
        .unwrap()
        .parent()
        .unwrap()
        .to_owned();
    let _ = write_args(&workdir);
    let _ = copy_stdout(&workdir);
    let _ = copy_stderr(&workdir);

    if let Ok(millis) = read_number::<u64>(&workdir, "sleep-millis") {
        std::thread::sleep(Duration::from_millis(millis));
    }
    let exit_status = read_number(&workdir, "exit-status").unwrap_or(0);
    std::process::exit(exit_status);
}

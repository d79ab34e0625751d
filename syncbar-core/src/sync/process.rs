use super::Error;
use std::time::Duration;
use tokio::{
    io::{AsyncBufReadExt as _, AsyncRead, AsyncWrite, AsyncWriteExt as _, BufReader},
    process::Child,
};

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum ExitStatus {
    Successful,
    Failed(Option<i32>),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        self == &ExitStatus::Successful
    }

    pub fn message(&self) -> String {
        match self {
            ExitStatus::Successful => "sync exited successfully".to_owned(),
            ExitStatus::Failed(Some(code)) => format!("sync exited with error status {}", code),
            ExitStatus::Failed(None) => "sync exited with unknown error status".to_owned(),
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if status.success() {
            ExitStatus::Successful
        } else {
            ExitStatus::Failed(status.code())
        }
    }
}

#[cfg(unix)]
fn ask_to_terminate(child: &mut Child) -> Result<(), Error> {
    // no pid means the child has already been reaped
    if let Some(pid) = child.id() {
        unsafe { libc::kill(pid as i32, libc::SIGTERM) };
    }
    Ok(())
}

#[cfg(not(unix))]
fn ask_to_terminate(child: &mut Child) -> Result<(), Error> {
    child
        .start_kill()
        .map_err(Error::SubprocessTerminateError)?;
    Ok(())
}

/// Copies `reader` into `sink` a line at a time. Lines are raw bytes, the sync
/// program prints file names in whatever encoding they have on disk.
async fn pump<R, W>(reader: Option<R>, mut sink: W, stream: &'static str) -> Result<(), Error>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(reader) = reader else {
        return Ok(());
    };
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(Error::SubprocessIoError)?;
        if read == 0 {
            break;
        }
        if !line.ends_with(b"\n") {
            line.push(b'\n');
        }
        tracing::debug!(stream, "{}", String::from_utf8_lossy(&line).trim_end());
        sink.write_all(&line).await.map_err(Error::LogSinkError)?;
        sink.flush().await.map_err(Error::LogSinkError)?;
    }
    Ok(())
}

#[derive(Debug)]
pub struct SyncProcess(pub(crate) Child);

impl SyncProcess {
    pub fn id(&self) -> Option<u32> {
        self.0.id()
    }

    /// Copies standard output and standard error line by line into the given
    /// sinks as the process produces them. Returns once both streams close.
    pub async fn stream_to<O, E>(&mut self, stdout_sink: O, stderr_sink: E) -> Result<(), Error>
    where
        O: AsyncWrite + Unpin,
        E: AsyncWrite + Unpin,
    {
        let stdout = self.0.stdout.take();
        let stderr = self.0.stderr.take();
        let (stdout_result, stderr_result) = tokio::join!(
            pump(stdout, stdout_sink, "stdout"),
            pump(stderr, stderr_sink, "stderr"),
        );
        stdout_result?;
        stderr_result
    }

    pub async fn wait(&mut self) -> Result<ExitStatus, Error> {
        self.0
            .wait()
            .await
            .map(ExitStatus::from)
            .map_err(Error::SubprocessStatusError)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(pid = self.0.id(), grace_period_secs = grace_period.as_secs_f64()))]
    pub async fn terminate(&mut self, grace_period: Duration) -> Result<(), Error> {
        tracing::debug!("trying to terminate gracefully");
        ask_to_terminate(&mut self.0)?;
        match tokio::time::timeout(grace_period, self.wait()).await {
            Ok(result) => {
                tracing::debug!("process terminated before timeout");
                result?;
            }
            Err(_) => {
                tracing::debug!("process did not terminate before timeout, killing it instead");
                self.0
                    .kill()
                    .await
                    .map_err(Error::SubprocessTerminateError)?;
            }
        };
        Ok(())
    }
}

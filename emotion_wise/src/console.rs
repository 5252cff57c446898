// Startup text shown before the camera opens, and the acknowledgment prompt.

use crate::config::SessionConfig;
use std::io::{self, BufRead, Write};

pub const LAUNCH_PROMPT: &str = "Press Enter to launch the camera...";

pub fn write_instructions<W: Write>(out: &mut W, config: &SessionConfig) -> io::Result<()> {
    writeln!(out, "Welcome to EmotionWise! The emotion detection app!")?;
    writeln!(out)?;
    writeln!(out, "Instructions:")?;
    writeln!(out, "- This application will detect emotions from your webcam feed.")?;
    writeln!(out, "- Press '{}' to quit the video feed.", config.quit_key)?;
    writeln!(
        out,
        "- The detected emotions will be saved to '{}' every {} seconds.",
        config.log_path.display(),
        config.log_interval.as_secs()
    )?;
    writeln!(out)
}

/// Prints `prompt` and blocks until one line (or end of input) is read.
pub fn wait_for_acknowledgment<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> io::Result<()> {
    write!(out, "{}", prompt)?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

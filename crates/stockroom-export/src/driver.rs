//! Sending input to the desktop.

use std::{process::Command, thread, time::Duration};

use crate::error::{Error, Result};

/// Something that can start the browser and type/click into it.
pub trait InputDriver {
  /// Start `command` detached; the export does not wait for it to exit.
  fn launch(&mut self, command: &str, args: &[String]) -> Result<()>;

  /// Press and release a named key (`tab`, `down`, `enter`, `space`, ...).
  fn key(&mut self, key: &str) -> Result<()>;

  /// Left-click at absolute screen coordinates.
  fn click(&mut self, x: i32, y: i32) -> Result<()>;

  fn pause(&mut self, duration: Duration);
}

/// Drives an X11 session through the `xdotool` binary.
#[derive(Debug, Clone)]
pub struct XdotoolDriver {
  program: String,
}

impl Default for XdotoolDriver {
  fn default() -> Self {
    Self {
      program: "xdotool".to_string(),
    }
  }
}

/// Map friendly key names to X keysyms; anything else passes through.
pub fn keysym(key: &str) -> &str {
  match key.to_ascii_lowercase().as_str() {
    "tab" => "Tab",
    "enter" | "return" => "Return",
    "space" => "space",
    "down" => "Down",
    "up" => "Up",
    "left" => "Left",
    "right" => "Right",
    "esc" | "escape" => "Escape",
    "backspace" => "BackSpace",
    _ => key,
  }
}

impl XdotoolDriver {
  fn xdotool(&self, args: &[&str]) -> Result<()> {
    let status = Command::new(&self.program)
      .args(args)
      .status()
      .map_err(|source| Error::Spawn {
        program: self.program.clone(),
        source,
      })?;
    if !status.success() {
      return Err(Error::CommandFailed {
        program: self.program.clone(),
        status,
      });
    }
    Ok(())
  }
}

impl InputDriver for XdotoolDriver {
  fn launch(&mut self, command: &str, args: &[String]) -> Result<()> {
    Command::new(command)
      .args(args)
      .spawn()
      .map_err(|source| Error::Spawn {
        program: command.to_owned(),
        source,
      })?;
    Ok(())
  }

  fn key(&mut self, key: &str) -> Result<()> { self.xdotool(&["key", keysym(key)]) }

  fn click(&mut self, x: i32, y: i32) -> Result<()> {
    let (x, y) = (x.to_string(), y.to_string());
    self.xdotool(&["mousemove", &x, &y, "click", "1"])
  }

  fn pause(&mut self, duration: Duration) { thread::sleep(duration) }
}

use std::fmt::Arguments;
use std::io::Write;

use anyhow::Result;
use termcolor::{Color, ColorSpec, WriteColor};

/// Console writer every user-visible line goes through.
pub(crate) struct Out<'a> {
    writer: &'a mut dyn WriteColor,
    indent: usize,
}

impl<'a> Out<'a> {
    pub(crate) fn new(writer: &'a mut dyn WriteColor) -> Self {
        Self { writer, indent: 0 }
    }

    /// Reborrow the writer with `n` additional indentation levels.
    pub(crate) fn indent(&mut self, n: usize) -> Out<'_> {
        Out {
            writer: &mut *self.writer,
            indent: self.indent + n,
        }
    }

    pub(crate) fn heading(&mut self, args: Arguments<'_>) -> Result<()> {
        self.colored(Color::Cyan, true, args)
    }

    pub(crate) fn info(&mut self, args: Arguments<'_>) -> Result<()> {
        self.line(None, args)
    }

    pub(crate) fn ok(&mut self, args: Arguments<'_>) -> Result<()> {
        self.colored(Color::Green, false, args)
    }

    pub(crate) fn warn(&mut self, args: Arguments<'_>) -> Result<()> {
        self.colored(Color::Yellow, false, args)
    }

    pub(crate) fn error(&mut self, args: Arguments<'_>) -> Result<()> {
        self.colored(Color::Red, false, args)
    }

    /// Unstyled continuation line.
    pub(crate) fn blank(&mut self, args: Arguments<'_>) -> Result<()> {
        self.line(None, args)
    }

    /// Write without a trailing newline and flush, for input prompts.
    pub(crate) fn prompt(&mut self, args: Arguments<'_>) -> Result<()> {
        write!(self.writer, "{args}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn colored(&mut self, color: Color, bold: bool, args: Arguments<'_>) -> Result<()> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color)).set_bold(bold);
        self.line(Some(&spec), args)
    }

    fn line(&mut self, spec: Option<&ColorSpec>, args: Arguments<'_>) -> Result<()> {
        for _ in 0..self.indent {
            write!(self.writer, "  ")?;
        }

        if let Some(spec) = spec {
            self.writer.set_color(spec)?;
        }

        writeln!(self.writer, "{args}")?;

        if spec.is_some() {
            self.writer.reset()?;
        }

        Ok(())
    }
}

macro_rules! heading {
    ($o:expr, $($arg:tt)*) => {
        $o.heading(core::format_args!($($arg)*))?
    };
}

macro_rules! info {
    ($o:expr, $($arg:tt)*) => {
        $o.info(core::format_args!($($arg)*))?
    };
}

macro_rules! ok {
    ($o:expr, $($arg:tt)*) => {
        $o.ok(core::format_args!($($arg)*))?
    };
}

macro_rules! warn_ {
    ($o:expr, $($arg:tt)*) => {
        $o.warn(core::format_args!($($arg)*))?
    };
}

macro_rules! error {
    ($o:expr, $($arg:tt)*) => {
        $o.error(core::format_args!($($arg)*))?
    };
}

macro_rules! blank {
    ($o:expr, $($arg:tt)*) => {
        $o.blank(core::format_args!($($arg)*))?
    };
}

pub(crate) use {blank, error, heading, info, ok, warn_ as warn};

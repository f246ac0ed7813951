use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, StdoutLock, Write as _},
    path::PathBuf,
};

use anyhow::Context;
use clap::Args;
use hypotest_core::dataset::Dataset;
use tracing::info;

/// Where the data comes from and how to read it.
#[derive(Debug, Clone, Args)]
pub(crate) struct InputArg {
    /// Path to a delimited data file (`-` reads standard input)
    #[arg(required_unless_present = "text", conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Freeform data: rows separated by newlines, values by spaces or commas
    #[arg(long)]
    pub text: Option<String>,

    /// Field delimiter of the data file
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// The data file has no header row; columns are named Column_1..Column_N
    #[arg(long)]
    pub no_header: bool,
}

impl InputArg {
    pub fn load(&self) -> anyhow::Result<Dataset> {
        if let Some(text) = &self.text {
            let dataset = Dataset::from_manual_text(text).context("Failed to parse --text data")?;
            info!(columns = dataset.columns().len(), "loaded pasted data");
            return Ok(dataset);
        }

        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| format!("Delimiter must be a single ASCII character: {:?}", self.delimiter))?;
        let path = self
            .input
            .as_ref()
            .context("Either an input file or --text is required")?;

        let reader: Box<dyn Read> = if path.as_os_str() == "-" {
            Box::new(io::stdin().lock())
        } else {
            let file = File::open(path)
                .with_context(|| format!("Failed to open data file: {}", path.display()))?;
            Box::new(BufReader::new(file))
        };
        let dataset = Dataset::from_csv_reader(reader, delimiter, !self.no_header)
            .with_context(|| format!("Failed to parse data file: {}", path.display()))?;
        info!(
            path = %path.display(),
            columns = dataset.columns().len(),
            "loaded data file"
        );
        Ok(dataset)
    }
}

/// JSON output destination options shared by the subcommands.
#[derive(Debug, Clone, Args)]
pub(crate) struct OutputArg {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Write JSON to this file instead of printing text
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl OutputArg {
    pub fn wants_json(&self) -> bool {
        self.json || self.output.is_some()
    }
}

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)?;
        if let Output::File { path, .. } = &output {
            info!(path = %path.display(), "saved JSON output");
        }
        Ok(())
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

//! Command line definition

// standard library
use std::path::PathBuf;

// external crates
use clap::{Args, Parser, Subcommand, ValueEnum};

// nmass modules
use nmass::db::{ExportFormat, Prefer};
use nmass::utils::f;

#[derive(Parser, Debug)]
#[command(
    name = "nmass",
    about = "Query fused AME2020, FRDM2012 and NUBASE2020 nuclear mass tables",
    version,
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options shared by every command
#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// JSON configuration file (environment variables otherwise)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the source tables and database
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose logging (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the database from the source tables
    Init {
        /// Rebuild even if a database already exists
        #[arg(long)]
        rebuild: bool,
    },

    /// Download the AME2020 and NUBASE2020 tables
    Fetch,

    /// Everything known about one nuclide, e.g. `Fe56` or `26 30`
    Lookup {
        /// Nuclide name, or proton and neutron numbers
        #[arg(num_args = 1..=2, required = true, value_name = "NUCLIDE|Z N")]
        target: Vec<String>,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// All nuclides of an element
    Isotopes {
        /// Proton number
        z: u16,

        #[command(flatten)]
        limit: LimitOption,
    },

    /// All nuclides with the same neutron number
    Isotones {
        /// Neutron number
        n: u16,

        #[command(flatten)]
        limit: LimitOption,
    },

    /// Overview of an element, e.g. `26` for iron
    Element {
        /// Proton number
        z: u16,

        /// Print the overview as JSON
        #[arg(long)]
        json: bool,
    },

    /// Neutron, proton and alpha separation energies
    Separation {
        /// Proton number
        z: u16,
        /// Neutron number
        n: u16,

        #[command(flatten)]
        prefer: PreferOption,
    },

    /// Q-value of initial + projectile -> final + ejectile
    ///
    /// The projectile is inferred from conservation of Z and N.
    Qvalue(QvalueArgs),

    /// Row counts of the database
    Summary,

    /// Write the fused table to a CSV or JSON file
    Export(ExportArgs),

    /// Look up every nuclide listed in a file
    ///
    /// One nuclide per line as Z and N separated by whitespace or a comma.
    /// Blank lines and lines starting with `#` are ignored.
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
pub struct LimitOption {
    /// Maximum number of nuclides to show
    #[arg(short = 'n', long, value_name = "COUNT", default_value_t = 50)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file, `nuclear_masses_<selection>.<format>` by default
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "csv")]
    pub format: FormatArg,

    /// Only nuclides with an AME2020 mass
    #[arg(long, conflicts_with = "theoretical_only")]
    pub experimental_only: bool,

    /// Only nuclides with nothing but an FRDM2012 mass
    #[arg(long)]
    pub theoretical_only: bool,
}

/// Which nuclides an export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    Experimental,
    PredictedOnly,
}

impl Selection {
    /// Name used in messages and default file names
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Experimental => "experimental",
            Self::PredictedOnly => "predicted-only",
        }
    }
}

impl ExportArgs {
    pub fn selection(&self) -> Selection {
        match (self.experimental_only, self.theoretical_only) {
            (true, _) => Selection::Experimental,
            (_, true) => Selection::PredictedOnly,
            _ => Selection::All,
        }
    }

    /// Output path, falling back on a name built from the selection
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => PathBuf::from(f!(
                "nuclear_masses_{}.{}",
                self.selection().label(),
                ExportFormat::from(self.format).extension()
            )),
        }
    }
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// File listing the nuclides
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file, stdout otherwise
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "csv")]
    pub format: BatchFormat,

    /// Fill in the separation energy columns
    #[arg(long)]
    pub sep_energies: bool,

    #[command(flatten)]
    pub prefer: PreferOption,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchFormat {
    Csv,
    Json,
    Table,
}

#[derive(Args, Debug)]
pub struct QvalueArgs {
    /// Initial proton number
    pub zi: u16,
    /// Initial neutron number
    pub ni: u16,
    /// Final proton number
    pub zf: u16,
    /// Final neutron number
    pub nf: u16,

    /// Ejectile proton number (0 with N=0 for a photon)
    #[arg(long, default_value_t = 0)]
    pub ejectile_z: u16,

    /// Ejectile neutron number
    #[arg(long, default_value_t = 0)]
    pub ejectile_n: u16,

    #[command(flatten)]
    pub prefer: PreferOption,
}

#[derive(Args, Debug)]
pub struct PreferOption {
    /// Mass source tried first, the other is the fallback
    #[arg(long, value_name = "SOURCE", default_value = "experimental")]
    pub prefer: PreferArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferArg {
    Experimental,
    Theoretical,
}

impl From<PreferArg> for Prefer {
    fn from(arg: PreferArg) -> Self {
        match arg {
            PreferArg::Experimental => Prefer::Experimental,
            PreferArg::Theoretical => Prefer::Theoretical,
        }
    }
}

impl PreferOption {
    pub fn prefer(&self) -> Prefer {
        self.prefer.into()
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

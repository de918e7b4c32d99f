//! Command implementations

// standard library
use std::io::Write;
use std::path::{Component, Path, PathBuf};

// external crates
use log::{info, warn};
use serde::Serialize;

// nmass modules
use nmass::db::{
    export_rows, write_rows, Config, Error, ExportFormat, NuclearDatabase, Nuclide, NuclideRecord,
    Prefer, Result, Session, FRDM_FILE,
};
use nmass::tables::{parse_nuclide, Fetcher, AME2020, NUBASE2020};
use nmass::utils::{f, OptionExt};

// internal modules
use crate::cli::{BatchArgs, BatchFormat, Command, ExportArgs, QvalueArgs, Selection};

/// Directories never written to by an export
const PROTECTED_DIRS: [&str; 7] = ["/bin", "/boot", "/etc", "/proc", "/sbin", "/sys", "/usr"];

/// Invalid batch lines reported individually before summarising the rest
const REPORTED_LINES: usize = 5;

pub fn dispatch(command: Command, config: Config, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Init { rebuild } => init(config, rebuild, out),
        Command::Fetch => fetch(config, out),
        Command::Lookup { target, json } => lookup(config, &target, json, out),
        Command::Isotopes { z, limit } => {
            let db = NuclearDatabase::open(config)?;
            write_table(out, &db.session()?.isotopes(z)?, limit.limit)
        }
        Command::Isotones { n, limit } => {
            let db = NuclearDatabase::open(config)?;
            write_table(out, &db.session()?.isotones(n)?, limit.limit)
        }
        Command::Element { z, json } => {
            let db = NuclearDatabase::open(config)?;
            let element = db.session()?.element(z)?;
            match json {
                true => writeln!(out, "{}", element.to_json()?)?,
                false => writeln!(out, "{element}")?,
            }
            Ok(())
        }
        Command::Separation { z, n, prefer } => {
            let db = NuclearDatabase::open(config)?;
            let session = db.session()?;
            let energies = session.separation_energies(z, n, prefer.prefer())?;
            writeln!(out, "{} ({})", Nuclide::new(z, n).name(), prefer.prefer())?;
            writeln!(out, "{energies}")?;
            Ok(())
        }
        Command::Qvalue(args) => qvalue(config, &args, out),
        Command::Summary => {
            let db = NuclearDatabase::open(config)?;
            writeln!(out, "{}", db.summary()?)?;
            Ok(())
        }
        Command::Export(args) => export(config, &args, out),
        Command::Batch(args) => batch(config, &args, out),
    }
}

fn init(config: Config, rebuild: bool, out: &mut impl Write) -> Result<()> {
    let db = NuclearDatabase::init(config, rebuild)?;
    writeln!(out, "Database ready at {}", db.path().display())?;
    writeln!(out, "{}", db.summary()?)?;
    Ok(())
}

fn fetch(config: Config, out: &mut impl Write) -> Result<()> {
    let mut fetcher = Fetcher::new()
        .with_timeout(config.download_timeout_s)
        .with_request_delay(config.request_delay());

    for source in [AME2020, NUBASE2020] {
        let path = fetcher.fetch(&source, &config.data_dir)?;
        writeln!(out, "{:<10} {}", source.name, path.display())?;
    }

    let frdm = config.data_file(FRDM_FILE);
    if !frdm.exists() {
        warn!(
            "FRDM2012 is only published as a PDF, save its text layer (pdftotext -layout) to {}",
            frdm.display()
        );
    }
    Ok(())
}

fn lookup(config: Config, target: &[String], json: bool, out: &mut impl Write) -> Result<()> {
    let nuclide = parse_target(target)?;
    let db = NuclearDatabase::open(config)?;
    let session = db.session()?;
    let record = session.nuclide(nuclide.z, nuclide.n)?;

    if json {
        writeln!(out, "{}", record.to_json()?)?;
        return Ok(());
    }

    writeln!(out, "{record}")?;
    let isomers = session
        .isomers(nuclide.z)?
        .into_iter()
        .filter(|state| state.n == nuclide.n)
        .collect::<Vec<_>>();
    if !isomers.is_empty() {
        writeln!(out, "  Isomeric states:")?;
        for state in isomers {
            writeln!(out, "    {state}")?;
        }
    }
    Ok(())
}

fn parse_target(target: &[String]) -> Result<Nuclide> {
    match target {
        [name] => {
            let (nuclide, isomer) = parse_nuclide(name)?;
            if !isomer.is_ground() {
                info!("Showing the ground state of {name}");
            }
            Ok(nuclide)
        }
        [z, n] => Ok(Nuclide::new(number("Z", z)?, number("N", n)?)),
        _ => Err(Error::Parameter {
            field: "nuclide",
            value: target.join(" "),
            reason: "expected a name like Fe56 or proton and neutron numbers".to_string(),
        }),
    }
}

fn number(field: &'static str, value: &str) -> Result<u16> {
    value.parse::<u16>().map_err(|e| Error::Parameter {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn qvalue(config: Config, args: &QvalueArgs, out: &mut impl Write) -> Result<()> {
    let db = NuclearDatabase::open(config)?;
    let prefer = args.prefer.prefer();

    let initial = Nuclide::new(args.zi, args.ni);
    let final_state = Nuclide::new(args.zf, args.nf);
    let ejectile = Nuclide::new(args.ejectile_z, args.ejectile_n);
    let q = db.session()?.q_value(initial, final_state, ejectile, prefer)?;

    match q {
        Some(q) => {
            let kind = if q >= 0.0 { "exothermic" } else { "endothermic" };
            writeln!(
                out,
                "Q({} -> {} + {}) = {q:.4} MeV ({kind}, {prefer})",
                initial.name(),
                final_state.name(),
                particle_name(ejectile)
            )?;
        }
        None => writeln!(out, "Q-value unavailable, a required mass is missing")?,
    }
    Ok(())
}

/// Conventional symbol for the light reaction particles
fn particle_name(nuclide: Nuclide) -> String {
    match (nuclide.z, nuclide.n) {
        (0, 0) => "g".to_string(),
        (0, 1) => "n".to_string(),
        (1, 0) => "p".to_string(),
        (1, 1) => "d".to_string(),
        (1, 2) => "t".to_string(),
        (2, 2) => "a".to_string(),
        _ => nuclide.name(),
    }
}

/// Listing of nuclides, truncated after `limit` rows
fn write_table(out: &mut impl Write, records: &[NuclideRecord], limit: usize) -> Result<()> {
    writeln!(
        out,
        "{:<8} {:>14} {:>14} {:>8}  {}",
        "Nuclide", "ME exp (keV)", "ME th (keV)", "beta2", "Half-life"
    )?;
    for r in records.iter().take(limit) {
        let mut line = f!(
            "{:<8} {:>14} {:>14} {:>8}",
            r.name(),
            r.mass_excess_exp_kev.display_prec(1),
            r.mass_excess_th_kev.display_prec(1),
            r.beta2.display_prec(3)
        );
        if let Some(half_life) = &r.half_life {
            line += &f!("  {half_life}");
        }
        writeln!(out, "{line}")?;
    }
    if records.len() > limit {
        let hidden = records.len() - limit;
        writeln!(out, "... and {hidden} more (use -n to show more)")?;
    }
    writeln!(out, "{} nuclides", records.len())?;
    Ok(())
}

fn export(config: Config, args: &ExportArgs, out: &mut impl Write) -> Result<()> {
    let path = checked_output(&args.output_path())?;
    let selection = args.selection();

    let db = NuclearDatabase::open(config)?;
    let session = db.session()?;
    let records = match selection {
        Selection::All => session.select_where("1 = 1")?,
        Selection::Experimental => session.select_where("has_experimental")?,
        Selection::PredictedOnly => session.predicted_only()?,
    };

    writeln!(
        out,
        "Exporting {} nuclides ({})",
        records.len(),
        selection.label()
    )?;
    export_rows(&records, ExportFormat::from(args.format), &path)?;
    writeln!(out, "Saved to {}", path.display())?;
    Ok(())
}

/// One output row of a batch lookup
#[derive(Serialize, Debug, Clone, PartialEq)]
struct BatchRow {
    z: u16,
    n: u16,
    a: u16,
    element: String,
    name: String,
    mass_excess_exp_kev: Option<f64>,
    mass_excess_th_kev: Option<f64>,
    beta2: Option<f64>,
    s_n_mev: Option<f64>,
    s_p_mev: Option<f64>,
    s_2n_mev: Option<f64>,
    s_2p_mev: Option<f64>,
    s_alpha_mev: Option<f64>,
}

impl BatchRow {
    fn new(record: &NuclideRecord) -> Self {
        Self {
            z: record.z,
            n: record.n,
            a: record.a,
            element: record.element.clone(),
            name: record.name(),
            mass_excess_exp_kev: record.mass_excess_exp_kev,
            mass_excess_th_kev: record.mass_excess_th_kev,
            beta2: record.beta2,
            s_n_mev: None,
            s_p_mev: None,
            s_2n_mev: None,
            s_2p_mev: None,
            s_alpha_mev: None,
        }
    }
}

fn batch(config: Config, args: &BatchArgs, out: &mut impl Write) -> Result<()> {
    let input = checked_input(&args.input)?;
    let output = args.output.as_deref().map(checked_output).transpose()?;
    let text = std::fs::read_to_string(&input)?;

    let db = NuclearDatabase::open(config)?;
    let session = db.session()?;
    let (rows, rejected) = batch_rows(&session, &text, args.sep_energies, args.prefer.prefer())?;

    for message in rejected.iter().take(REPORTED_LINES) {
        warn!("Skipped {message}");
    }
    if rejected.len() > REPORTED_LINES {
        warn!("... and {} more", rejected.len() - REPORTED_LINES);
    }
    if rows.is_empty() {
        return Err(Error::Parameter {
            field: "input",
            value: input.display().to_string(),
            reason: "no valid nuclides listed".to_string(),
        });
    }
    info!("Looked up {} nuclides, skipped {}", rows.len(), rejected.len());

    match (args.format, output) {
        (BatchFormat::Table, Some(path)) => {
            let mut file = std::io::BufWriter::new(std::fs::File::create(&path)?);
            write_batch_table(&mut file, &rows)?;
            file.flush()?;
            writeln!(out, "Saved to {}", path.display())?;
        }
        (BatchFormat::Table, None) => write_batch_table(out, &rows)?,
        (format, Some(path)) => {
            export_rows(&rows, export_format(format), &path)?;
            writeln!(out, "Saved to {}", path.display())?;
        }
        (format, None) => write_rows(&rows, export_format(format), out)?,
    }
    Ok(())
}

fn export_format(format: BatchFormat) -> ExportFormat {
    match format {
        BatchFormat::Json => ExportFormat::Json,
        _ => ExportFormat::Csv,
    }
}

/// Look up every listed nuclide, collecting messages for the lines skipped
fn batch_rows(
    session: &Session,
    text: &str,
    sep_energies: bool,
    prefer: Prefer,
) -> Result<(Vec<BatchRow>, Vec<String>)> {
    let mut rows = Vec::new();
    let mut rejected = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (z, n) = match batch_line(line) {
            Ok(zn) => zn,
            Err(e) => {
                rejected.push(f!("line {}: {e}", i + 1));
                continue;
            }
        };

        let record = match session.find_nuclide(z, n) {
            Ok(Some(record)) => record,
            Ok(None) => {
                let name = Nuclide::new(z, n).name();
                rejected.push(f!("line {}: {name} is not in the database", i + 1));
                continue;
            }
            Err(e @ Error::Parameter { .. }) => {
                rejected.push(f!("line {}: {e}", i + 1));
                continue;
            }
            Err(e) => return Err(e),
        };

        let mut row = BatchRow::new(&record);
        if sep_energies {
            let energies = session.separation_energies(z, n, prefer)?;
            row.s_n_mev = energies.s_n;
            row.s_p_mev = energies.s_p;
            row.s_2n_mev = energies.s_2n;
            row.s_2p_mev = energies.s_2p;
            row.s_alpha_mev = energies.s_alpha;
        }
        rows.push(row);
    }
    Ok((rows, rejected))
}

/// Proton and neutron number separated by whitespace or a comma
fn batch_line(line: &str) -> Result<(u16, u16)> {
    let fields = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>();

    match fields[..] {
        [z, n] => Ok((number("Z", z)?, number("N", n)?)),
        _ => Err(Error::Parameter {
            field: "line",
            value: line.to_string(),
            reason: "expected Z and N".to_string(),
        }),
    }
}

fn write_batch_table(out: &mut impl Write, rows: &[BatchRow]) -> Result<()> {
    writeln!(
        out,
        "{:<8} {:>14} {:>14} {:>8} {:>10} {:>10}",
        "Nuclide", "ME exp (keV)", "ME th (keV)", "beta2", "S_n (MeV)", "S_p (MeV)"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<8} {:>14} {:>14} {:>8} {:>10} {:>10}",
            row.name,
            row.mass_excess_exp_kev.display_prec(1),
            row.mass_excess_th_kev.display_prec(1),
            row.beta2.display_prec(3),
            row.s_n_mev.display_prec(3),
            row.s_p_mev.display_prec(3)
        )?;
    }
    Ok(())
}

fn has_parent_component(path: &Path) -> bool {
    path.components().any(|c| c == Component::ParentDir)
}

/// Existing regular file without `..` components
fn checked_input(path: &Path) -> Result<PathBuf> {
    let reject = |reason: &str| Error::Parameter {
        field: "input",
        value: path.display().to_string(),
        reason: reason.to_string(),
    };

    if has_parent_component(path) {
        return Err(reject("parent directory components are not allowed"));
    }
    if !path.is_file() {
        return Err(reject("not a readable file"));
    }
    Ok(path.to_path_buf())
}

/// Absolute output path outside of the system directories
fn checked_output(path: &Path) -> Result<PathBuf> {
    let reject = |reason: &str| Error::Parameter {
        field: "output",
        value: path.display().to_string(),
        reason: reason.to_string(),
    };

    if path.as_os_str().is_empty() {
        return Err(reject("empty path"));
    }
    if has_parent_component(path) {
        return Err(reject("parent directory components are not allowed"));
    }

    let absolute = match path.is_absolute() {
        true => path.to_path_buf(),
        false => std::env::current_dir()
            .map_err(|_| reject("current directory unavailable"))?
            .join(path),
    };
    let resolved = absolute.canonicalize().unwrap_or(absolute);

    if PROTECTED_DIRS.iter().any(|dir| resolved.starts_with(dir)) {
        return Err(reject("refusing to write into a system directory"));
    }
    if resolved.is_dir() {
        return Err(reject("is a directory"));
    }
    Ok(resolved)
}

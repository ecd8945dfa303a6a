use anyhow::{Context, bail};
use idx_vision::core_modules::hex_dump::{write_grid_file, write_label_average_file};
use idx_vision::core_modules::utils::bitmap_helper::save_bmp;
use idx_vision::parallel_pipeline::load_dataset;
use idx_vision::pipeline::{Dataset, DatasetPipeline, PipelineConfig, Report};
use log::info;
use std::env;
use std::path::{Path, PathBuf};

/// Command line arguments: `<mnist_dir> <answer_dir> [--set train|t10k]`.
#[derive(Debug, Clone, PartialEq)]
struct Args {
    mnist_dir: PathBuf,
    answer_dir: PathBuf,
    set: String,
}

impl Args {
    fn parse(args: &[String]) -> anyhow::Result<Option<Self>> {
        if args.len() < 3 {
            return Ok(None);
        }
        let set = match args.get(3).map(String::as_str) {
            None => "train".to_string(),
            Some("--set") => match args.get(4).map(String::as_str) {
                Some(set @ ("train" | "t10k")) => set.to_string(),
                Some(other) => bail!("unknown set {other:?}, expected train or t10k"),
                None => bail!("--set needs a value"),
            },
            Some(other) => bail!("unexpected argument {other:?}"),
        };
        Ok(Some(Self {
            mnist_dir: PathBuf::from(&args[1]),
            answer_dir: PathBuf::from(&args[2]),
            set,
        }))
    }
}

/// Finds `{set}-{kind}.{idx}-ubyte`, falling back to the hyphenated
/// `{set}-{kind}-{idx}-ubyte` spelling.
fn resolve_idx(dir: &Path, set: &str, kind: &str, idx: &str) -> anyhow::Result<PathBuf> {
    let candidates = [
        dir.join(format!("{set}-{kind}.{idx}-ubyte")),
        dir.join(format!("{set}-{kind}-{idx}-ubyte")),
    ];
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .with_context(|| format!("no {set} {kind} file in {}", dir.display()))
}

/// Writes the text and bitmap answers for `report` into `dir`.
fn write_answers(
    report: &Report,
    dataset: &Dataset,
    dir: &Path,
    set: &str,
) -> anyhow::Result<Vec<PathBuf>> {
    let n = report.sample_count;
    let mut written = Vec::new();

    let path = dir.join("2. First images.txt");
    write_grid_file(&path, &report.first_image)
        .with_context(|| format!("writing {}", path.display()))?;
    written.push(path);

    let path = dir.join(format!("3. Images 1 - {n} average.txt"));
    write_grid_file(&path, &report.sample_average)
        .with_context(|| format!("writing {}", path.display()))?;
    written.push(path);

    let path = dir.join(format!("4. Labels 1 - {n} average.txt"));
    write_label_average_file(&path, &dataset.labels()[..n])
        .with_context(|| format!("writing {}", path.display()))?;
    written.push(path);

    let path = dir.join("5. First resized image.txt");
    write_grid_file(&path, &report.first_centered)
        .with_context(|| format!("writing {}", path.display()))?;
    written.push(path);

    let path = dir.join("6. First image.bmp");
    save_bmp(&path, &report.first_image).with_context(|| format!("writing {}", path.display()))?;
    written.push(path);

    for (i, (raw, centered)) in report
        .samples
        .iter()
        .zip(&report.centered_samples)
        .enumerate()
    {
        let path = dir.join(format!("{set}-images_{i}.bmp"));
        save_bmp(&path, raw).with_context(|| format!("writing {}", path.display()))?;
        written.push(path);

        let path = dir.join(format!("{set}-images-resized_{i}.bmp"));
        save_bmp(&path, centered).with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // --- 1. Argument Parsing & Setup ---
    let raw_args: Vec<String> = env::args().collect();
    let Some(args) = Args::parse(&raw_args)? else {
        println!("Usage: idx_tester <mnist_dir> <answer_dir> [--set train|t10k]");
        return Ok(());
    };
    std::fs::create_dir_all(&args.answer_dir)
        .with_context(|| format!("creating {}", args.answer_dir.display()))?;

    // --- 2. Concurrent Decode ---
    let images_path = resolve_idx(&args.mnist_dir, &args.set, "images", "idx3")?;
    let labels_path = resolve_idx(&args.mnist_dir, &args.set, "labels", "idx1")?;
    let dataset = load_dataset(images_path.clone(), labels_path.clone())
        .await
        .with_context(|| {
            format!(
                "decoding {} and {}",
                images_path.display(),
                labels_path.display()
            )
        })?;
    println!("Decoded {} examples from the {} set", dataset.len(), args.set);

    // --- 3. Answer Generation ---
    let pipeline = DatasetPipeline::new(PipelineConfig::default());
    let report = pipeline.generate_report(&dataset)?;

    // --- 4. Write Answers ---
    println!("Label mean over the first {}: {}", report.sample_count, report.label_average);
    let written = write_answers(&report, &dataset, &args.answer_dir, &args.set)?;
    for path in &written {
        info!("wrote {}", path.display());
    }

    println!(
        "Processing complete. {} answers saved to {}",
        written.len(),
        args.answer_dir.display()
    );
    Ok(())
}

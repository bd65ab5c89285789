pub mod config_reader;
pub mod export;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod pages;

use log::{debug, info, warn};

use rank_model::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::{GenerateArgs, InfoArgs, NavigateArgs};
use crate::gen::config_reader::{ModelSettings, Translations};
use crate::gen::export::{model_json, script_data, PageLinks};
use crate::gen::io_common::{input_kind, split_sections, InputKind};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum GenError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Cannot tell the format of {path} (expected .xlsx or .csv)"))]
    UnknownInputType { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("The translation file {path} is not a JSON object"))]
    TranslationNotObject { path: String },
    #[snafu(display("Unknown ranking policy '{keyword}' (expected mean or product)"))]
    UnknownRanking { keyword: String },
    #[snafu(display("Error in the model {path}: {source}"))]
    LoadingModel { source: ModelError, path: String },
    #[snafu(display("{source}"))]
    Navigating { source: NavigationError },
    #[snafu(display("Error writing {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type GenResult<T> = Result<T, GenError>;
pub type BGenResult<T> = Result<T, Box<GenError>>;

pub fn read_grid(path: &str) -> BGenResult<Vec<Vec<String>>> {
    match input_kind(path) {
        Some(InputKind::Excel) => io_excel::read_excel_grid(path),
        Some(InputKind::Csv) => io_csv::read_csv_grid(path),
        None => Err(Box::new(GenError::UnknownInputType {
            path: path.to_string(),
        })),
    }
}

/// Reads a model file and builds the model. The settings of the `Config:`
/// section are overridden by the JSON configuration file, if any.
pub fn load_model_file(
    data_path: &str,
    config_path: Option<&str>,
) -> BGenResult<(Model, ModelSettings)> {
    let grid = read_grid(data_path)?;
    let sections = split_sections(&grid);

    let mut settings = match sections.config.as_ref() {
        Some(t) => ModelSettings::from_table(t)?,
        None => ModelSettings::default(),
    };
    if let Some(p) = config_path {
        settings = settings.overridden_by(ModelSettings::read_file(p)?);
    }
    info!("load_model_file: settings: {:?}", settings);

    let raw = RawModel {
        data: sections.data,
        data_types: sections
            .data_types
            .map(|t| t.to_pairs())
            .unwrap_or_default(),
        orders: sections.orders.map(|t| t.to_pairs()).unwrap_or_default(),
        details: sections.details,
        answer_column: settings.answer_column.clone(),
    };
    let model = load_model(&raw).context(LoadingModelSnafu { path: data_path })?;
    for answer in model.duplicate_answers() {
        warn!(
            "load_model_file: answer {:?} is defined several times in {:?}",
            answer.to_string(),
            data_path
        );
    }
    Ok((model, settings))
}

fn read_json(path: &str) -> GenResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

fn check_reference(model: &Model, reference_path: &str) -> GenResult<()> {
    let pretty_js = serde_json::to_string_pretty(&model_json(model)).context(ParsingJsonSnafu {})?;
    let reference = read_json(reference_path)?;
    let pretty_js_ref = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
    if pretty_js_ref != pretty_js {
        warn!("Found differences with the reference data");
        print_diff(pretty_js_ref.as_str(), pretty_js.as_ref(), "\n");
        whatever!("Difference detected between the model data and the reference data")
    }
    info!("check_reference: model data matches {:?}", reference_path);
    Ok(())
}

/// Generates the static site.
pub fn run_generate(args: &GenerateArgs) -> BGenResult<()> {
    let (model, settings) = load_model_file(&args.data, args.config.as_deref())?;
    let translations = match args.translation.as_deref() {
        Some(p) => Translations::read_file(p)?,
        None => Translations::default(),
    };
    let policy = settings.ranking_policy()?;
    let out_dir = Path::new(&args.outdir);
    info!(
        "run_generate: answer column: {:?}, ranking: {:?}, output: {:?}",
        model.table().answer_column(),
        policy,
        out_dir
    );

    let details = pages::write_details_pages(&model, &settings, &translations, out_dir)?;
    let mut links = PageLinks {
        details,
        categories: vec![],
    };
    links.categories =
        pages::write_category_pages(&model, &settings, &translations, &links, out_dir)?;

    let data = script_data(&model, &links, &translations, policy);
    let index = pages::index_page(&settings, &translations, &data, args.embedscripts);
    pages::write_index(out_dir, &index, args.embedscripts)?;

    if let Some(reference) = args.reference.as_deref() {
        check_reference(&model, reference)?;
    }
    Ok(())
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

/// The table, the values of every characteristic and the number of possible pages.
pub fn format_info(model: &Model) -> String {
    let table = model.table();
    let mut lines: Vec<String> = vec![table.columns().join(" | ")];
    for row in table.rows().iter() {
        lines.push(
            row.cells
                .iter()
                .map(|c| join_values(c.values()))
                .collect::<Vec<String>>()
                .join(" | "),
        );
    }
    lines.push("".to_string());
    for (_, name) in table.characteristics() {
        let values = model.possible_values().get(name).unwrap_or(&[]);
        lines.push(format!(
            "{}: {} values: {}",
            name,
            values.len(),
            join_values(values)
        ));
    }
    lines.push(format!(
        "total count: {}",
        model.possible_values().total_count(table.answer_column())
    ));
    lines.join("\n") + "\n"
}

pub fn run_info(args: &InfoArgs) -> BGenResult<()> {
    let (model, _) = load_model_file(&args.data, args.config.as_deref())?;
    print!("{}", format_info(&model));
    Ok(())
}

/// The ranked answers, then the options left per characteristic. Selected
/// options are starred.
pub fn format_navigation(res: &NavigationResult) -> String {
    let mut lines: Vec<String> = Vec::new();
    for r in res.ranked.iter() {
        lines.push(format!("{:>3}% {}", r.percent(), r.answer));
    }
    for co in res.options.iter() {
        let options: Vec<String> = co
            .options
            .iter()
            .map(|o| {
                let star = if o.selected { "*" } else { "" };
                format!("{}{} ({})", star, o.value, o.count)
            })
            .collect();
        lines.push(format!("{}: {}", co.name, options.join(", ")));
    }
    lines.join("\n") + "\n"
}

pub fn run_navigate(args: &NavigateArgs) -> BGenResult<()> {
    let (model, settings) = load_model_file(&args.data, args.config.as_deref())?;
    let policy = match args.ranking.as_deref() {
        Some(keyword) => {
            RankingPolicy::from_keyword(keyword).context(UnknownRankingSnafu { keyword })?
        }
        None => settings.ranking_policy()?,
    };
    let mut selection = Selection::new();
    for raw in args.select.iter() {
        let (name, value) = Selection::parse_pair(raw).context(NavigatingSnafu {})?;
        selection = selection.pick(&name, &value);
    }
    debug!("run_navigate: selection: {:?}", selection);
    let res = model
        .navigator()
        .apply_selection(&selection, policy)
        .context(NavigatingSnafu {})?;
    print!("{}", format_navigation(&res));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_dir() -> String {
        option_env!("RANKGEN_TEST_DIR")
            .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data"))
            .to_string()
    }

    fn data_path(test_name: &str, file_name: &str) -> String {
        format!("{}/{}/{}", test_dir(), test_name, file_name)
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let p = std::env::temp_dir().join(format!("rankgen_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&p);
        p
    }

    fn generate_args(test_name: &str, out_dir: &Path) -> GenerateArgs {
        GenerateArgs {
            data: data_path(test_name, &format!("{}.csv", test_name)),
            translation: None,
            config: None,
            embedscripts: false,
            outdir: out_dir.display().to_string(),
            reference: None,
        }
    }

    fn read(p: PathBuf) -> String {
        fs::read_to_string(&p).unwrap_or_else(|_| panic!("missing {:?}", p))
    }

    #[test]
    fn furniture_generate() {
        init();
        let out = scratch_dir("furniture_generate");
        let mut args = generate_args("furniture", &out);
        args.translation = Some(data_path("furniture", "furniture_translation.json"));
        args.reference = Some(data_path("furniture", "furniture_expected_data.json"));
        run_generate(&args).unwrap();

        let index = read(out.join("index.html"));
        assert!(index.contains("<title>Furniture</title>"));
        assert!(index.contains("const ANSWER_COLUMN = \"name\";"));
        assert!(index.contains("const RANKING_POLICY = \"mean\";"));
        assert!(index.contains("<a href='?'>Clear all</a>"));
        assert!(index.contains("<script src=\"navigate.js\"></script>"));
        assert!(out.join("navigate.js").exists());
        assert!(out.join("styles.css").exists());

        let table = read(out.join("pages/match_0.html"));
        assert!(table.contains("<title>table - Furniture</title>"));
        assert!(table.contains("Sturdy oak"));
        assert!(table.contains(
            "<a href=\"https://example.com/table\">https://example.com/table</a>"
        ));
        assert!(table.contains("<a href=\"match_1.html\">"));
        let bench = read(out.join("pages/match_2.html"));
        assert!(bench.contains("<span class=\"empty\">[empty]</span>"));
        let chair = read(out.join("pages/match_3.html"));
        assert!(!chair.contains("match_4.html"));

        let colors = read(out.join("pages/category_0.html"));
        assert!(colors.contains("<th>Colour:</th>"));
        assert!(colors.contains("<a href=\"../pages/match_1.html\">stool</a>"));
        assert!(out.join("pages/category_2.html").exists());
        assert!(!out.join("pages/category_3.html").exists());
    }

    #[test]
    fn furniture_config_override() {
        init();
        let out = scratch_dir("furniture_config_override");
        let mut args = generate_args("furniture", &out);
        args.config = Some(data_path("furniture", "furniture_config.json"));
        args.embedscripts = true;
        run_generate(&args).unwrap();

        let index = read(out.join("index.html"));
        assert!(index.contains("<title>Furniture catalog</title>"));
        assert!(index.contains("const RANKING_POLICY = \"product\";"));
        assert!(index.contains("class Navigator"));
        assert!(index.contains("\"sub/match_0.html\""));
        assert!(!out.join("navigate.js").exists());
        assert!(out.join("sub/match_0.html").exists());
    }

    #[test]
    fn reference_mismatch() {
        init();
        let out = scratch_dir("reference_mismatch");
        fs::create_dir_all(&out).unwrap();
        let reference = out.join("reference.json");
        fs::write(&reference, "{\"answerColumn\": \"title\"}").unwrap();
        let mut args = generate_args("furniture", &out.join("site"));
        args.reference = Some(reference.display().to_string());
        let res = run_generate(&args).map_err(|e| *e);
        assert!(matches!(res, Err(GenError::Whatever { .. })));
    }

    #[test]
    fn furniture_info() {
        init();
        let (model, settings) =
            load_model_file(&data_path("furniture", "furniture.csv"), None).unwrap();
        assert_eq!(settings.page_title(), "Furniture");
        let info = format_info(&model);
        assert!(info.starts_with("name | color | size | legs\ntable | blue, red | large | 4\n"));
        assert!(info.contains("size: 4 values: small, medium, large, huge\n"));
        assert!(info.contains("legs: 2 values: 3, 4\n"));
        // 3 colors * 4 sizes * 2 legs * 3!
        assert!(info.ends_with("total count: 144\n"));
    }

    #[test]
    fn furniture_navigation() {
        init();
        let (model, _) = load_model_file(&data_path("furniture", "furniture.csv"), None).unwrap();
        let sel = Selection::new().pick("size", "small").pick("legs", "4");
        let res = model
            .navigator()
            .apply_selection(&sel, RankingPolicy::Mean)
            .unwrap();
        assert_eq!(
            format_navigation(&res),
            " 88% chair\n 75% table\n 75% bench\ncolor: blue (2), green (1), red (1)\n"
        );

        let sel = Selection::new().pick("color", "red").pick("color", "green");
        let res = model
            .navigator()
            .apply_selection(&sel, RankingPolicy::Mean)
            .unwrap();
        let text = format_navigation(&res);
        assert!(text.contains("\ncolor: blue (1), *green (1), *red (2)\n"));
        assert!(text.ends_with("size: small (1), large (2)\nlegs: 3 (1), 4 (2)\n"));
    }

    #[test]
    fn bad_order() {
        init();
        let res = load_model_file(&data_path("bad_order", "bad_order.csv"), None).map_err(|e| *e);
        match res {
            Err(GenError::LoadingModel { source, .. }) => {
                assert!(matches!(source, ModelError::ValueNotInOrder { .. }))
            }
            x => panic!("unexpected {:?}", x.map(|_| ())),
        }
    }

    #[test]
    fn unknown_input_type() {
        let res = read_grid("model.ods").map_err(|e| *e);
        assert!(matches!(res, Err(GenError::UnknownInputType { .. })));
    }
}

use anyhow::Result;
use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::{fs, fs::File, path::Path};
use stormscraper::{process, Config, StormError};
use tempfile::tempdir;

const HEADER: &str = "BEGIN_YEARMONTH,BEGIN_DAY,BEGIN_TIME,END_YEARMONTH,END_DAY,END_TIME,EPISODE_ID,EVENT_ID,STATE,STATE_FIPS,YEAR,MONTH_NAME,EVENT_TYPE,CZ_TYPE,CZ_FIPS,CZ_NAME,WFO,MAGNITUDE,INJURIES_DIRECT,INJURIES_INDIRECT,DEATHS_DIRECT,DEATHS_INDIRECT,DAMAGE_PROPERTY,DAMAGE_CROPS,SOURCE,BEGIN_LAT";

fn event(ym: u32, id: u32, state: &str, mag: &str, prop: &str, crops: &str) -> String {
    format!(
        "{ym},4,1530,{ym},4,1600,900,{id},{state},48,{y},March,\"Thunderstorm Wind\",C,201,\"HARRIS, TX\",HGX,{mag},1,0,0,0,{prop},{crops},Trained Spotter,29.7\n",
        y = ym / 100
    )
}

fn write_year(raw: &Path, year: i32, rows: &[String]) -> Result<()> {
    let mut text = format!("{HEADER}\n");
    for r in rows {
        text.push_str(r);
    }
    fs::write(
        raw.join(format!("StormEvents_details-ftp_v1.0_d{year}_c20240716.csv")),
        text,
    )?;
    Ok(())
}

fn read_output(path: &Path) -> Result<Vec<RecordBatch>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?.build()?;
    Ok(reader.collect::<std::result::Result<Vec<_>, _>>()?)
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> &'a T {
    batch
        .column_by_name(name)
        .unwrap_or_else(|| panic!("missing column {name}"))
        .as_any()
        .downcast_ref::<T>()
        .unwrap_or_else(|| panic!("unexpected type for {name}"))
}

fn setup(dir: &Path) -> Result<Config> {
    let raw = dir.join("raw");
    fs::create_dir_all(&raw)?;

    write_year(
        &raw,
        2010,
        &[
            event(201005, 1, "OKLAHOMA", "50", "10K", "0"),
            event(201006, 2, "NEW MEXICO", "", "", ""),
        ],
    )?;
    write_year(
        &raw,
        2011,
        &[
            event(201103, 3, "TEXAS", "1.75", "10.5K", "2M"),
            event(201104, 4, "LOUISIANA", "60", "1B", "1B"),
            event(201111, 5, "Texas", "EF1", "0.75B", "garbage"),
            event(201112, 6, "texas", "52", "NA", ""),
        ],
    )?;
    write_year(&raw, 2012, &[event(201201, 7, "ARKANSAS", "0", "1K", "1K")])?;

    Ok(Config {
        raw_dir: raw,
        output_path: dir.join("interim/tx.parquet"),
        start_year: 2010,
        end_year: 2012,
        batch_rows: 2,
        ..Config::default()
    })
}

#[test]
fn only_matching_year_reaches_output() -> Result<()> {
    let dir = tempdir()?;
    let cfg = setup(dir.path())?;

    let report = process::run(&cfg)?;
    assert_eq!(report.rows, 3);
    let per_year: Vec<(i32, usize)> = report.years.iter().map(|y| (y.year, y.rows)).collect();
    assert_eq!(per_year, vec![(2010, 0), (2011, 3), (2012, 0)]);

    let batches = read_output(&cfg.output_path)?;
    let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total_rows, 3);

    let mut event_ids = Vec::new();
    for b in &batches {
        let year = column::<Int64Array>(b, "BEGIN_YEAR");
        let month = column::<Int64Array>(b, "BEGIN_MONTH");
        let ym = column::<Int64Array>(b, "BEGIN_YEARMONTH");
        let state = column::<StringArray>(b, "STATE");
        let prop = column::<Float64Array>(b, "DAMAGE_PROPERTY_USD");
        let crops = column::<Float64Array>(b, "DAMAGE_CROPS_USD");
        let total = column::<Float64Array>(b, "TOTAL_DAMAGE_USD");
        let ids = column::<Int64Array>(b, "EVENT_ID");

        for i in 0..b.num_rows() {
            assert_eq!(year.value(i), 2011);
            assert_eq!(month.value(i), ym.value(i) % 100);
            assert_eq!(state.value(i).to_uppercase(), "TEXAS");
            assert_eq!(total.value(i), prop.value(i) + crops.value(i));
            event_ids.push(ids.value(i));
        }
    }
    assert_eq!(event_ids, vec![3, 5, 6]);
    Ok(())
}

#[test]
fn output_values_are_normalized() -> Result<()> {
    let dir = tempdir()?;
    let cfg = setup(dir.path())?;
    process::run(&cfg)?;

    let batches = read_output(&cfg.output_path)?;
    let b = arrow::compute::concat_batches(&batches[0].schema(), &batches)?;

    let names: Vec<String> = b
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    assert_eq!(names.len(), 25);
    assert_eq!(names[0], "BEGIN_YEARMONTH");
    assert!(!names.iter().any(|n| n == "WFO" || n == "BEGIN_LAT"));
    assert_eq!(
        &names[20..],
        &[
            "DAMAGE_PROPERTY_USD",
            "DAMAGE_CROPS_USD",
            "TOTAL_DAMAGE_USD",
            "BEGIN_YEAR",
            "BEGIN_MONTH"
        ]
    );

    let prop = column::<Float64Array>(&b, "DAMAGE_PROPERTY_USD");
    let crops = column::<Float64Array>(&b, "DAMAGE_CROPS_USD");
    assert_eq!(prop.values(), &[10_500.0, 750_000_000.0, 0.0]);
    assert_eq!(crops.values(), &[2_000_000.0, 0.0, 0.0]);

    let mag = column::<Float64Array>(&b, "MAGNITUDE");
    assert_eq!(mag.values(), &[1.75, 0.0, 52.0]);
    assert!(!mag.is_null(1));

    let month = column::<Int64Array>(&b, "BEGIN_MONTH");
    assert_eq!(month.values(), &[3, 11, 12]);

    let raw_prop = column::<StringArray>(&b, "DAMAGE_PROPERTY");
    assert_eq!(raw_prop.value(0), "10.5K");
    let cz = column::<StringArray>(&b, "CZ_NAME");
    assert_eq!(cz.value(0), "HARRIS, TX");
    Ok(())
}

#[test]
fn rerun_overwrites_output() -> Result<()> {
    let dir = tempdir()?;
    let mut cfg = setup(dir.path())?;
    process::run(&cfg)?;

    cfg.region = "oklahoma".into();
    let report = process::run(&cfg)?;
    assert_eq!(report.rows, 1);

    let rows: usize = read_output(&cfg.output_path)?
        .iter()
        .map(|b| b.num_rows())
        .sum();
    assert_eq!(rows, 1);
    Ok(())
}

#[test]
fn missing_year_aborts_before_writing() -> Result<()> {
    let dir = tempdir()?;
    let mut cfg = setup(dir.path())?;
    cfg.end_year = 2013;

    let err = process::run(&cfg).unwrap_err();
    assert!(matches!(err, StormError::MissingLocalFile { year: 2013, .. }));
    assert!(!cfg.output_path.exists());
    Ok(())
}

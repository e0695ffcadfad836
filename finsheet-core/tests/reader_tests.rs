use finsheet_core::reader::{read_workbook, read_workbook_from_bytes};
use finsheet_core::{
    CellValue, Dashboard, DashboardConfig, Extraction, LoadError, MatchPolicy, Verdict, extract,
};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

enum Fixture<'a> {
    Str(&'a str),
    Num(f64),
    Error(&'a str),
    Blank,
}

use Fixture::{Blank, Error, Num, Str};

type FixtureSheet<'a> = (&'a str, Vec<Vec<Fixture<'a>>>);

fn col_letter(col: usize) -> char {
    (b'A' + col as u8) as char
}

fn sheet_xml(rows: &[Vec<Fixture<'_>>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", col_letter(c), r + 1);
            match cell {
                Str(s) => xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    reference, s
                )),
                Num(n) => xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n)),
                Error(e) => xml.push_str(&format!(
                    r#"<c r="{}" t="e"><v>{}</v></c>"#,
                    reference, e
                )),
                Blank => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

// Helper to create a minimal valid XLSX file for testing
fn create_mock_xlsx(path: &Path, sheets: &[FixtureSheet<'_>]) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options)?;
    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
"#,
    );
    for (i, _) in sheets.iter().enumerate() {
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            i + 1
        ));
    }
    content_types.push_str("</Types>");
    zip.write_all(content_types.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    let mut workbook_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
"#,
    );
    for (i, (name, _)) in sheets.iter().enumerate() {
        workbook_xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            name,
            i + 1,
            i + 1
        ));
    }
    workbook_xml.push_str("</sheets></workbook>");
    zip.write_all(workbook_xml.as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    let mut rels_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    for (i, _) in sheets.iter().enumerate() {
        rels_xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            i + 1
        ));
    }
    rels_xml.push_str("</Relationships>");
    zip.write_all(rels_xml.as_bytes())?;

    for (i, (_, rows)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
        zip.write_all(sheet_xml(rows).as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}

fn fixture_sheets() -> Vec<FixtureSheet<'static>> {
    vec![
        (
            "Maruti Suzuki",
            vec![
                vec![Str("Metric"), Str("Mar 2023"), Blank, Str("Mar 2024")],
                vec![Str("Net Profit"), Num(80.0), Num(1.0), Num(100.0)],
                vec![Str("M Score"), Num(-2.9), Blank, Str("-1.5")],
                vec![Str("Random Note"), Blank, Blank, Blank],
                vec![Str("Accruals"), Str("abc"), Blank, Num(42.0)],
                vec![Str("Z Score"), Error("#DIV/0!"), Blank, Num(2.4)],
            ],
        ),
        (
            "Eicher Motors",
            vec![
                vec![Str("Metric"), Str("Mar 2024"), Str("Mar 2024")],
                vec![Str("Sales"), Num(10.0), Num(11.0)],
            ],
        ),
    ]
}

#[test]
fn test_companies_come_from_sheet_names() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("companies.xlsx");
    create_mock_xlsx(&path, &fixture_sheets())?;

    let workbook = read_workbook(&path)?;
    assert_eq!(workbook.companies(), vec!["Maruti Suzuki", "Eicher Motors"]);
    assert_eq!(workbook.path.as_deref(), Some(path.as_path()));

    Ok(())
}

#[test]
fn test_extract_from_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("extract.xlsx");
    create_mock_xlsx(&path, &fixture_sheets())?;

    let workbook = read_workbook(&path)?;
    let maruti = workbook.get_sheet("Maruti Suzuki").expect("sheet exists");

    // Blank header column is dropped
    let profit = extract(maruti, "PROFIT", MatchPolicy::First);
    let profit = profit.first().expect("profit row");
    assert_eq!(profit.values(), vec![Some(80.0), Some(100.0)]);
    assert_eq!(profit.points[1].period, "Mar 2024");

    let m_score = extract(maruti, "m score", MatchPolicy::First);
    assert_eq!(m_score.first().expect("m score").values(), vec![Some(-2.9), Some(-1.5)]);

    let accruals = extract(maruti, "accrual", MatchPolicy::First);
    assert_eq!(accruals.first().expect("accruals").values(), vec![None, Some(42.0)]);

    let z_score = extract(maruti, "z score", MatchPolicy::First);
    assert_eq!(z_score.first().expect("z score").values(), vec![None, Some(2.4)]);

    let scores = extract(maruti, "score", MatchPolicy::All);
    assert_eq!(scores.series().len(), 2);

    assert_eq!(extract(maruti, "xyz", MatchPolicy::All), Extraction::NoMatch);

    // Duplicate period headers are kept as-is
    let eicher = workbook.get_sheet("Eicher Motors").expect("sheet exists");
    let sales = extract(eicher, "sales", MatchPolicy::First);
    let sales = sales.first().expect("sales row");
    assert_eq!(sales.points.len(), 2);
    assert_eq!(sales.points[0].period, sales.points[1].period);

    Ok(())
}

#[test]
fn test_bytes_and_path_agree() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bytes.xlsx");
    create_mock_xlsx(&path, &fixture_sheets())?;

    let from_path = read_workbook(&path)?;
    let from_bytes = read_workbook_from_bytes(std::fs::read(&path)?)?;

    assert!(from_bytes.path.is_none());
    assert_eq!(from_path.companies(), from_bytes.companies());
    for (a, b) in from_path.sheets.iter().zip(&from_bytes.sheets) {
        assert_eq!(a.headers, b.headers);
        assert_eq!(a.rows, b.rows);
    }
    assert_eq!(
        from_path.sheets[0].get_cell(4, 1),
        Some(&CellValue::Error("Div0".to_string()))
    );

    Ok(())
}

#[test]
fn test_dashboard_from_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dashboard.xlsx");
    create_mock_xlsx(&path, &fixture_sheets())?;

    let workbook = read_workbook(&path)?;
    let dashboard = Dashboard::build(&workbook, &DashboardConfig::default(), &[])?;

    let maruti = &dashboard.companies[0];
    assert_eq!(maruti.scores.card.m_score, Some(-1.5));
    assert_eq!(maruti.scores.verdict, Some(Verdict::HighRisk));
    assert!(maruti.revenue.is_empty());

    let eicher = &dashboard.companies[1];
    assert_eq!(eicher.revenue.first().expect("sales").latest(), Some(11.0));
    assert_eq!(eicher.scores.verdict, None);

    Ok(())
}

#[test]
fn test_missing_file_is_load_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = read_workbook(dir.path().join("missing.xlsx"));
    assert!(matches!(result, Err(LoadError::Open { .. })));
}

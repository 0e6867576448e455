use serde_json::{json, Value};
use std::io::Write;
use std::process::{Command, Stdio};

/// Helper function to run tabplot and capture stdout, or stderr on failure
fn run_tabplot(args: &[&str]) -> Result<Vec<u8>, String> {
    let output = Command::new(env!("CARGO_BIN_EXE_tabplot"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Helper function to run tabplot with CSV piped to stdin
fn run_tabplot_stdin(args: &[&str], csv_data: &str) -> Result<Vec<u8>, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tabplot"))
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    {
        let stdin = child.stdin.as_mut().ok_or("Failed to open stdin")?;
        stdin
            .write_all(csv_data.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Check that the output is a valid PNG file
fn is_valid_png(data: &[u8]) -> bool {
    data.len() > 8 && data[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn fixture(name: &str) -> String {
    format!("{}/test/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn run_json(args: &[&str]) -> Value {
    let result = run_tabplot(args);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    serde_json::from_slice(&result.unwrap()).expect("Output is not valid JSON")
}

#[test]
fn test_end_to_end_bar_chart_default_columns() {
    let genes = fixture("genes.csv");
    let figure = run_json(&["plot", &genes, "--kind", "bar"]);

    assert_eq!(figure["data"][0]["type"], json!("bar"));
    assert_eq!(figure["data"][0]["x"], json!(["BRCA1", "TP53", "EGFR", "MYC"]));
    assert_eq!(figure["data"][0]["y"], json!([12.5, 7.2, 20.1, 3.4]));
    assert_eq!(figure["data"][0]["name"], json!("Gene vs Sample1"));
    assert_eq!(figure["layout"]["title"], json!("Bar Chart of Gene vs Sample1"));
    assert_eq!(figure["config"]["responsive"], json!(true));
}

#[test]
fn test_end_to_end_scatter_plot() {
    let measurements = fixture("measurements.csv");
    let figure = run_json(&["plot", &measurements, "-x", "height", "-y", "weight"]);

    assert_eq!(figure["data"][0]["mode"], json!("markers"));
    assert_eq!(figure["data"][0]["x"].as_array().unwrap().len(), 5);
    // empty cell becomes null but keeps its row position
    assert_eq!(figure["data"][0]["y"][4], Value::Null);
    assert_eq!(figure["layout"]["xaxis"]["title"], json!("height"));
}

#[test]
fn test_end_to_end_box_plot() {
    let measurements = fixture("measurements.csv");
    let figure = run_json(&["plot", &measurements, "-x", "group", "-y", "height", "-k", "box"]);
    assert_eq!(figure["data"][0]["type"], json!("box"));
    assert_eq!(figure["layout"]["title"], json!("Box Plot of group vs height"));
}

#[test]
fn test_end_to_end_incompatible_still_plots() {
    let pets = fixture("pets.json");
    let figure = run_json(&["plot", &pets, "--kind", "scatter"]);
    assert_eq!(figure["data"][0]["x"], json!([1, 2]));
    assert_eq!(figure["data"][0]["y"], json!(["cat", "dog"]));
}

#[test]
fn test_end_to_end_unknown_chart_kind() {
    let genes = fixture("genes.csv");
    let result = run_tabplot(&["plot", &genes, "--kind", "pie"]);
    assert!(result.is_err(), "Should have failed with unknown chart kind");
    assert!(result.unwrap_err().contains("Unknown chart type"));
}

#[test]
fn test_end_to_end_column_not_found() {
    let genes = fixture("genes.csv");
    let result = run_tabplot(&["plot", &genes, "-x", "Gene", "-y", "Missing"]);
    assert!(result.is_err(), "Should have failed with column not found");
    assert!(result.unwrap_err().contains("Missing"));
}

#[test]
fn test_end_to_end_single_column_has_no_selection() {
    let single = fixture("single_column.csv");
    let result = run_tabplot(&["plot", &single]);
    assert!(result.is_err(), "Should not plot with fewer than two columns");
}

#[test]
fn test_end_to_end_unsupported_file() {
    let result = run_tabplot(&["plot", "data.xlsx"]);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("File type not supported"));
}

#[test]
fn test_end_to_end_columns_listing() {
    let genes = fixture("genes.csv");
    let result = run_tabplot(&["columns", &genes]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let text = String::from_utf8(result.unwrap()).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Gene\tcategorical");
    assert_eq!(lines[1], "Sample1\tnumeric");
    assert_eq!(lines[4], "default selection: x=Gene y=Sample1");
}

#[test]
fn test_end_to_end_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("figure.json");
    let genes = fixture("genes.csv");

    let result = run_tabplot(&["plot", &genes, "-o", out.to_str().unwrap()]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(result.unwrap().is_empty());

    let figure: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(figure["data"][0]["type"], json!("scatter"));
}

#[test]
fn test_end_to_end_transpose_unreachable_server() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let server = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let genes = fixture("genes.csv");
    let result = run_tabplot(&["transpose", &genes, "--server", &server]);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Error transposing data"));
}

#[test]
fn test_end_to_end_scatter_png() {
    let measurements = fixture("measurements.csv");
    let result = run_tabplot(&["plot", &measurements, "-x", "height", "-y", "weight", "-f", "png"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()), "Output is not a valid PNG");
}

#[test]
fn test_end_to_end_bar_png() {
    let genes = fixture("genes.csv");
    let result = run_tabplot(&[
        "plot", &genes, "--kind", "bar", "--format", "png", "--width", "400", "--height", "300",
    ]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()), "Output is not a valid PNG");
}

#[test]
fn test_end_to_end_box_png() {
    let measurements = fixture("measurements.csv");
    let result = run_tabplot(&["plot", &measurements, "-x", "group", "-y", "height", "-k", "box", "-f", "png"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()), "Output is not a valid PNG");
}

#[test]
fn test_end_to_end_bar_svg_labels_categories() {
    let genes = fixture("genes.csv");
    let result = run_tabplot(&["plot", &genes, "--kind", "bar", "--format", "svg"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let svg = String::from_utf8(result.unwrap()).unwrap();

    assert!(svg.starts_with("<svg"));
    for gene in ["BRCA1", "TP53", "EGFR", "MYC"] {
        assert!(svg.contains(gene), "missing category label {}", gene);
    }
    assert!(svg.contains("Bar Chart of Gene vs Sample1"));
}

#[test]
fn test_end_to_end_png_canvas_too_large() {
    let genes = fixture("genes.csv");
    let result = run_tabplot(&["plot", &genes, "-f", "png", "--width", "40000", "--height", "40000"]);
    assert!(result.is_err(), "Should refuse to allocate an oversized canvas");
    assert!(result.unwrap_err().contains("too large"));
}

#[test]
fn test_end_to_end_csv_from_stdin() {
    let csv_data = "city,population\nOslo,709000\nBergen,286000\n";
    let result = run_tabplot_stdin(&["plot", "-", "--kind", "bar"], csv_data);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let figure: Value = serde_json::from_slice(&result.unwrap()).unwrap();

    assert_eq!(figure["data"][0]["x"], json!(["Oslo", "Bergen"]));
    assert_eq!(figure["data"][0]["y"], json!([709000, 286000]));
}

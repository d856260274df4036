use approx::assert_relative_eq;
use aruco_laser::aruco_laser_core::{
    ArucoDictionary, DrawCommand, MarkerSelection, PageSize, RecordingSink, Rgb,
};
use aruco_laser::{generate_sheet, BuiltinMarkerSource, GenerateError, MarkerSource, SheetOptions};

fn single_marker(dictionary: ArucoDictionary, id: i64) -> SheetOptions {
    SheetOptions {
        dictionary,
        selection: MarkerSelection::Ids(vec![id]),
        rows: Some(1),
        cols: Some(1),
        ..SheetOptions::default()
    }
}

#[test]
fn single_marker_document_is_centered() {
    let options = single_marker(ArucoDictionary::Dict4x4_50, 0);
    let plan = options.prepare().unwrap();
    let mut sink = RecordingSink::new();
    let pages = plan.render(&BuiltinMarkerSource, &mut sink).unwrap();
    assert_eq!(pages, 1);
    assert_eq!(sink.page_count(), 1);

    let grid = BuiltinMarkerSource
        .bit_grid(ArucoDictionary::Dict4x4_50, 0)
        .unwrap();
    let commands: Vec<_> = sink.commands().collect();
    assert_eq!(
        commands.iter().filter(|c| c.is_filled_rect()).count(),
        grid.mark_count()
    );
    assert_eq!(commands.iter().filter(|c| c.is_stroked_rect()).count(), 1);
    for command in &commands {
        let expected = match command {
            DrawCommand::FilledRect { .. } => Rgb::ENGRAVE,
            DrawCommand::StrokedRect { .. } => Rgb::CUT,
            DrawCommand::Text { .. } => Rgb::LABEL,
        };
        assert_eq!(command.color(), expected);
    }

    let texts: Vec<_> = commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, ["0"]);

    let cut = commands
        .iter()
        .find_map(|c| match c {
            DrawCommand::StrokedRect { rect, .. } => Some(*rect),
            _ => None,
        })
        .unwrap();
    let (cx, cy) = cut.center();
    assert_relative_eq!(cx, PageSize::A4.width() / 2.0, epsilon = 1e-9);
    assert_relative_eq!(cy, PageSize::A4.height() / 2.0, epsilon = 1e-9);
    assert_relative_eq!(cut.width, plan.layout().footprint(), epsilon = 1e-9);
}

#[test]
fn engraved_cells_stay_inside_cut_square() {
    let options = SheetOptions {
        dictionary: ArucoDictionary::Dict6x6_250,
        selection: MarkerSelection::Range { start: 0, end: 8 },
        markers_per_page: 9,
        ..SheetOptions::default()
    };
    let mut sink = RecordingSink::new();
    options
        .prepare()
        .unwrap()
        .render(&BuiltinMarkerSource, &mut sink)
        .unwrap();

    // Each marker emits its cells, then its cut square.
    let border = options.layout().border;
    let mut cells = Vec::new();
    let mut markers = 0;
    for command in sink.commands() {
        match command {
            DrawCommand::FilledRect { rect, .. } => cells.push(*rect),
            DrawCommand::StrokedRect { rect: cut, .. } => {
                assert!(!cells.is_empty());
                for cell in cells.drain(..) {
                    assert!(cell.x >= cut.x + border - 1e-9);
                    assert!(cell.y >= cut.y + border - 1e-9);
                    assert!(cell.x + cell.width <= cut.x + cut.width - border + 1e-9);
                    assert!(cell.y + cell.height <= cut.y + cut.height - border + 1e-9);
                }
                markers += 1;
            }
            DrawCommand::Text { .. } => {}
        }
    }
    assert_eq!(markers, 9);
}

#[test]
fn forty_nine_markers_span_two_pages() {
    let options = SheetOptions {
        selection: MarkerSelection::Range { start: 0, end: 48 },
        markers_per_page: 25,
        show_labels: false,
        ..SheetOptions::default()
    };
    let mut sink = RecordingSink::new();
    let pages = options
        .prepare()
        .unwrap()
        .render(&BuiltinMarkerSource, &mut sink)
        .unwrap();
    assert_eq!(pages, 2);

    let per_page: Vec<usize> = sink
        .pages()
        .iter()
        .map(|page| page.iter().filter(|c| c.is_stroked_rect()).count())
        .collect();
    assert_eq!(per_page, [25, 24]);
    assert_eq!(sink.commands().filter(|c| c.is_text()).count(), 0);
}

#[test]
fn invalid_id_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("bad.pdf");
    let options = SheetOptions {
        output: output.clone(),
        ..single_marker(ArucoDictionary::Dict4x4_50, 50)
    };
    let err = generate_sheet(&options, &BuiltinMarkerSource).unwrap_err();
    assert!(matches!(err, GenerateError::InvalidMarkerId(_)));
    assert_eq!(
        err.to_string(),
        "Marker IDs must be between 0 and 49 for 4X4_50 (got 50)"
    );
    assert!(!output.exists());
}

#[test]
fn generated_pdf_and_report_land_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("nested").join("sheet.pdf");
    let options = SheetOptions {
        selection: MarkerSelection::Range { start: 0, end: 29 },
        page: PageSize::Letter,
        markers_per_page: 12,
        output: output.clone(),
        ..SheetOptions::default()
    };
    let report = generate_sheet(&options, &BuiltinMarkerSource).unwrap();
    assert_eq!(report.marker_count, 30);
    assert_eq!(report.pages, 3);
    assert_eq!(report.grid.rows, 3);
    assert_eq!(report.grid.cols, 4);

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    let json_path = dir.path().join("report.json");
    report.write_json(&json_path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["dictionary"], "4X4_50");
    assert_eq!(json["pages"], 3);
    assert_eq!(json["ids"].as_array().unwrap().len(), 30);
}

use crate::mask::{CompositeConverter, MaskConverter};
use crate::metadata::ResolvedColumn;
use crate::types::ValueConverter;

/// Short description of a converter, including its mask kind if it masks
pub fn describe_converter(converter: &(dyn ValueConverter + 'static)) -> String {
    let any = converter.as_any();
    if let Some(mask) = any.downcast_ref::<MaskConverter>() {
        format!("mask({})", mask.mask_kind())
    } else if let Some(composite) = any.downcast_ref::<CompositeConverter>() {
        format!("mask({}) over {}", composite.mask_kind(), composite.delegate().name())
    } else {
        converter.name().to_string()
    }
}

/// Format resolved columns as a table: header row plus one row per column
pub fn format_resolution_report(
    resolved: &[ResolvedColumn],
    show_ignored: bool,
) -> (Vec<String>, Vec<Vec<String>>) {
    let columns = vec![
        "column".to_string(),
        "property".to_string(),
        "type".to_string(),
        "jdbc".to_string(),
        "converter".to_string(),
    ];

    let rows = resolved
        .iter()
        .filter(|r| show_ignored || !r.descriptor.is_ignored())
        .map(|r| {
            let descriptor = &r.descriptor;
            vec![
                descriptor.column().to_string(),
                descriptor.property().to_string(),
                descriptor
                    .property_type()
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                descriptor.jdbc_type().map_or("-", |t| t.name()).to_string(),
                r.converter
                    .as_deref()
                    .map(describe_converter)
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    (columns, rows)
}

/// Render a header and rows as left-aligned text columns
pub fn render_table(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(columns);
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    for row in rows {
        out.push('\n');
        out.push_str(&line(row.as_slice()));
    }
    out
}

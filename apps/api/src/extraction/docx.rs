use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};

use super::ExtractionError;

/// Paragraph separator in the raw text output.
const PARAGRAPH_BREAK: &str = "\n\n";

/// Reads a DOCX from memory and returns the raw text of its body, formatting
/// stripped. Table cells are read row by row.
pub(super) fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(para) => paragraphs.push(paragraph_text(para)),
            DocumentChild::Table(table) => collect_table(table, &mut paragraphs),
            _ => {}
        }
    }

    Ok(paragraphs
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_BREAK))
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_children(&para.children, &mut text);
    text
}

fn push_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children(&link.children, out),
            _ => {}
        }
    }
}

fn collect_table(table: &Table, paragraphs: &mut Vec<String>) {
    for row in &table.rows {
        #[allow(unreachable_patterns)]
        let row = match row {
            TableChild::TableRow(row) => row,
            _ => continue,
        };
        for cell in &row.cells {
            #[allow(unreachable_patterns)]
            let cell = match cell {
                TableRowChild::TableCell(cell) => cell,
                _ => continue,
            };
            for content in &cell.children {
                if let TableCellContent::Paragraph(para) = content {
                    paragraphs.push(paragraph_text(para));
                }
            }
        }
    }
}

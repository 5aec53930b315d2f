//! CSV parser for course and semester worksheets
//!
//! Optional metadata lines come first (`Student,Ada Obi` / `Mode,gpa`), then
//! a header row, then one row per course or semester:
//!
//! ```text
//! Student,Ada Obi
//! Code,Units,Grade
//! MTH101,5,A
//! PHY101,4,B
//! ```
//!
//! A header starting with `Name` or `Semester` makes it a semester sheet
//! (`Name,TCR,TGP` or `Name,TCR,GPA`).

use super::{Cell, CourseRow, SemesterRow, Worksheet, WorksheetError};

/// Column roles recognized in a header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Code,
    Units,
    Grade,
    Name,
    Tcr,
    Tgp,
    Gpa,
    Ignored,
}

impl Column {
    fn from_header(header: &str) -> Self {
        match header.trim().to_lowercase().as_str() {
            "code" | "course" | "course code" => Self::Code,
            "units" | "credit units" | "cu" | "credits" => Self::Units,
            "grade" => Self::Grade,
            "name" | "semester" => Self::Name,
            "tcr" | "total credit registered" => Self::Tcr,
            "tgp" | "tce" | "total grade points" => Self::Tgp,
            "gpa" => Self::Gpa,
            _ => Self::Ignored,
        }
    }
}

/// Parse a CSV worksheet
///
/// # Errors
/// Returns [`WorksheetError::Csv`] if no header row is found, the header
/// mixes course and semester columns, or a row has too many fields.
pub fn parse_csv(content: &str) -> Result<Worksheet, WorksheetError> {
    let mut sheet = Worksheet::default();
    let mut columns: Option<Vec<Column>> = None;

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let fields = parse_csv_line(line);

        if columns.is_none() {
            match parse_header(&fields, line_number)? {
                Some(parsed) => columns = Some(parsed),
                None => parse_metadata(&mut sheet, &fields),
            }
            continue;
        }
        let header = columns.as_deref().unwrap_or_default();

        if fields.len() > header.len() {
            return Err(WorksheetError::Csv {
                line: line_number,
                message: format!("expected {} fields, found {}", header.len(), fields.len()),
            });
        }
        if header.contains(&Column::Name) {
            sheet.semesters.push(semester_row(header, &fields, line_number));
        } else {
            sheet.courses.push(course_row(header, &fields, line_number));
        }
    }

    if columns.is_none() {
        return Err(WorksheetError::Csv {
            line: content.lines().count(),
            message: "no header row found (expected Code,Units,Grade or Name,TCR,TGP)"
                .to_string(),
        });
    }

    Ok(sheet)
}

/// Metadata lines are `Key,Value` pairs before the header
fn parse_metadata(sheet: &mut Worksheet, fields: &[String]) {
    if fields.len() < 2 {
        return;
    }
    let value = fields[1].clone();
    match fields[0].to_lowercase().as_str() {
        "student" | "student name" => sheet.student = Some(value),
        "mode" => sheet.mode = Some(value),
        _ => {}
    }
}

/// A header row is one whose first cell names a course or semester column
fn parse_header(fields: &[String], line: usize) -> Result<Option<Vec<Column>>, WorksheetError> {
    let Some(first) = fields.first() else {
        return Ok(None);
    };
    if !matches!(Column::from_header(first), Column::Code | Column::Name) {
        return Ok(None);
    }

    let columns: Vec<Column> = fields.iter().map(|h| Column::from_header(h)).collect();
    let course_columns = columns
        .iter()
        .any(|c| matches!(c, Column::Units | Column::Grade));
    let semester_columns = columns
        .iter()
        .any(|c| matches!(c, Column::Tcr | Column::Tgp | Column::Gpa));

    if course_columns && semester_columns {
        return Err(WorksheetError::Csv {
            line,
            message: "header mixes course and semester columns".to_string(),
        });
    }
    if !course_columns && !semester_columns {
        return Ok(None);
    }
    Ok(Some(columns))
}

fn course_row(columns: &[Column], fields: &[String], line: usize) -> CourseRow {
    let mut row = CourseRow {
        row: line,
        ..CourseRow::default()
    };
    for (column, value) in columns.iter().zip(fields) {
        match column {
            Column::Code => row.code.clone_from(value),
            Column::Units => row.units = cell(value),
            Column::Grade => row.grade = Some(value.clone()).filter(|g| !g.is_empty()),
            _ => {}
        }
    }
    row
}

fn semester_row(columns: &[Column], fields: &[String], line: usize) -> SemesterRow {
    let mut row = SemesterRow {
        row: line,
        ..SemesterRow::default()
    };
    for (column, value) in columns.iter().zip(fields) {
        match column {
            Column::Name => row.name = Some(value.clone()).filter(|n| !n.is_empty()),
            Column::Tcr => row.tcr = cell(value),
            Column::Tgp => row.tgp = cell(value),
            Column::Gpa => row.gpa = cell(value),
            _ => {}
        }
    }
    row
}

/// Empty cells are absent, not zero
fn cell(value: &str) -> Option<Cell> {
    if value.is_empty() {
        None
    } else {
        Some(Cell::Text(value.to_string()))
    }
}

/// Parse a CSV line into trimmed fields, honoring double quotes
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    // A trailing comma adds nothing
    while fields.len() > 1 && fields.last().is_some_and(String::is_empty) {
        fields.pop();
    }
    fields
}

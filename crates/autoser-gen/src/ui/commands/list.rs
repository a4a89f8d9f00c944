use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use crossterm::style::Color;

use crate::{
  generator::orchestrator::{CandidateReport, CandidateStatus, Orchestrator},
  ui::{Colors, CrateArgs, colors::IntoComfyColor, term_width},
};

fn status_color(status: CandidateStatus, colors: &Colors) -> Color {
  match status {
    CandidateStatus::Generated => colors.success(),
    CandidateStatus::Rejected { .. } => colors.error(),
    CandidateStatus::Empty | CandidateStatus::Inert => colors.warning(),
    CandidateStatus::Unmarked => colors.timestamp(),
  }
}

fn fields_cell(report: &CandidateReport) -> String {
  match report.status {
    CandidateStatus::Generated => report.fields_serialized.to_string(),
    _ => "-".to_string(),
  }
}

fn equality_cell(report: &CandidateReport) -> &'static str {
  match report.equality {
    Some(true) => "yes",
    Some(false) => "no",
    None => "-",
  }
}

pub async fn list_candidates(args: &CrateArgs, colors: &Colors) -> anyhow::Result<()> {
  let root_file = args.root_file().await?;
  let orchestrator = Orchestrator::load(&args.manifest_path, &root_file).await?;
  let output = orchestrator.generate()?;

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut header = Row::new();
  for title in ["TYPE", "LOCATION", "STATUS", "FIELDS", "EQUALITY"] {
    header.add_cell(Cell::new(title).fg(IntoComfyColor::into(colors.label())));
  }
  table.set_header(header);

  for report in &output.reports {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(&report.type_path)
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(report.location.to_string()).fg(IntoComfyColor::into(colors.timestamp())));
    row.add_cell(Cell::new(report.status.to_string()).fg(IntoComfyColor::into(status_color(report.status, colors))));
    row.add_cell(
      Cell::new(fields_cell(report))
        .fg(IntoComfyColor::into(colors.primary()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(equality_cell(report)).fg(IntoComfyColor::into(colors.accent())));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}

//! Multi-inspection summary report.

use vistoria_core::aggregation::{summarize, DistributionEntry, InspectionSummary};
use vistoria_core::inspection::{ChecklistStatus, InspectionRecord, InspectionStatus};

use crate::error::ExportError;
use crate::pdf::render_sheet;
use crate::sheet::{Rgb, Sheet, Stat};

fn status_color(label: &str) -> Rgb {
    match InspectionStatus::parse(label) {
        Ok(InspectionStatus::Completed) => Rgb::GREEN,
        Ok(InspectionStatus::InProgress) => Rgb::BLUE,
        Ok(InspectionStatus::Pending) => Rgb::AMBER,
        Err(_) => Rgb::GREY,
    }
}

fn chart_rows(entries: &[DistributionEntry]) -> Vec<(String, usize)> {
    entries.iter().map(|e| (e.label.clone(), e.count)).collect()
}

fn percent(count: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.0}%", count as f64 * 100.0 / total as f64)
}

/// Lay out the reports page: status distribution, non-conformities per area,
/// inspections per month, overall totals and the list of inspections.
pub fn compose_summary_sheet(records: &[InspectionRecord], summary: &InspectionSummary) -> Sheet {
    let totals = summary.totals;
    let mut sheet = Sheet::new();

    sheet.title("Relatórios de Vistorias");
    sheet.subtitle("Distribuição geral das vistorias cadastradas.");

    sheet.heading("Resumo Geral");
    sheet.stat_row(&[
        Stat {
            label: "Total de Vistorias".into(),
            value: totals.total_inspections.to_string(),
            color: Rgb::BLACK,
        },
        Stat {
            label: "Total de Itens".into(),
            value: totals.total_items.to_string(),
            color: Rgb::BLACK,
        },
        Stat {
            label: "Não Conformidades".into(),
            value: totals.non_conformities.to_string(),
            color: Rgb::RED,
        },
        Stat {
            label: "Itens Aprovados".into(),
            value: totals.approved_items.to_string(),
            color: Rgb::GREEN,
        },
    ]);

    sheet.heading("Vistorias por Status");
    if summary.by_status.is_empty() {
        sheet.note("Nenhuma vistoria cadastrada.");
    }
    for entry in &summary.by_status {
        sheet.item(
            &entry.label,
            &format!(
                "{} ({})",
                entry.count,
                percent(entry.count, totals.total_inspections)
            ),
            status_color(&entry.label),
            "",
        );
    }

    sheet.heading("Não Conformidades por Área");
    if summary.non_conformities_by_area.is_empty() {
        sheet.note("Nenhum item reprovado.");
    } else {
        sheet.bar_chart(&chart_rows(&summary.non_conformities_by_area), Rgb::RED);
    }

    sheet.heading("Vistorias por Mês");
    if summary.by_month.is_empty() {
        sheet.note("Nenhuma vistoria cadastrada.");
    } else {
        sheet.bar_chart(&chart_rows(&summary.by_month), Rgb::BLUE);
    }

    if !records.is_empty() {
        sheet.heading("Vistorias");
        for record in records {
            let rejected = record
                .tagged_items()
                .filter(|(_, item)| item.status == ChecklistStatus::Rejected)
                .count();
            sheet.item(
                &record.project_name,
                record.status.label(),
                status_color(record.status.label()),
                &format!(
                    "{} - {} - Responsável: {} - {} itens, {} não conformidade(s)",
                    record.date.format("%d/%m/%Y"),
                    record.address,
                    record.responsible,
                    record.item_count(),
                    rejected
                ),
            );
        }
    }

    sheet
}

/// PDF bytes of the summary report over `records`.
pub fn render_summary_pdf(records: &[InspectionRecord]) -> Result<Vec<u8>, ExportError> {
    let summary = summarize(records);
    let sheet = compose_summary_sheet(records, &summary);
    render_sheet(&sheet, "Relatório de Vistorias")
}

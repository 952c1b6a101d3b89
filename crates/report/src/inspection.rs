//! Individual inspection report.

use vistoria_core::inspection::{ChecklistArea, ChecklistStatus, InspectionRecord, Photo};
use vistoria_core::report::{linked_photos, ReportSummary};

use crate::error::ExportError;
use crate::pdf::render_sheet;
use crate::sheet::{Rgb, Sheet, Stat};

const DATE_FORMAT: &str = "%d/%m/%Y";
const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

pub(crate) fn status_color(status: ChecklistStatus) -> Rgb {
    match status {
        ChecklistStatus::Approved => Rgb::GREEN,
        ChecklistStatus::Rejected => Rgb::RED,
        ChecklistStatus::Pending => Rgb::GREY,
    }
}

fn photo_line(photo: &Photo) -> String {
    let caption = if photo.caption.trim().is_empty() {
        "Sem legenda"
    } else {
        photo.caption.trim()
    };
    let mut line = format!("{caption} ({})", photo.taken_at.format(DATE_TIME_FORMAT));
    if let Some(point) = photo.location {
        line.push_str(&format!(
            " - {:.5}, {:.5}",
            point.latitude, point.longitude
        ));
    }
    line
}

/// Lay out the detailed report of one inspection.
pub fn compose_inspection_sheet(record: &InspectionRecord) -> Sheet {
    let summary = ReportSummary::for_record(record);
    let mut sheet = Sheet::new();

    sheet.title(&format!("Relatório Detalhado: {}", record.project_name));
    sheet.subtitle(&format!(
        "{} - Realizada em {}",
        record.address,
        record.date.format(DATE_FORMAT)
    ));
    sheet.gap(3.0);
    sheet.field("Responsável", &record.responsible);
    sheet.field("Status", record.status.label());

    sheet.stat_row(&[
        Stat {
            label: "Itens Aprovados".into(),
            value: summary.approved.to_string(),
            color: Rgb::GREEN,
        },
        Stat {
            label: "Itens Reprovados".into(),
            value: summary.rejected.to_string(),
            color: Rgb::RED,
        },
        Stat {
            label: "Total de Itens".into(),
            value: summary.total.to_string(),
            color: Rgb::BLUE,
        },
    ]);

    for area in ChecklistArea::ALL {
        sheet.heading(area.label());
        let items = record.items(area);
        if items.is_empty() {
            sheet.note("Nenhum item nesta categoria.");
            continue;
        }
        for item in items {
            let mut detail = if item.notes.trim().is_empty() {
                "Sem observações.".to_string()
            } else {
                item.notes.trim().to_string()
            };
            let photos = linked_photos(record, item.id);
            if !photos.is_empty() {
                let captions: Vec<String> = photos.iter().map(|p| photo_line(p)).collect();
                detail.push_str(&format!("\nFotos: {}", captions.join("; ")));
            }
            sheet.item(&item.name, item.status.label(), status_color(item.status), &detail);
        }
    }

    if !record.general_notes.trim().is_empty() {
        sheet.heading("Observações Gerais");
        sheet.paragraph(&record.general_notes);
    }

    if !record.photos.is_empty() {
        sheet.heading("Registro Fotográfico");
        for photo in &record.photos {
            sheet.paragraph(&photo_line(photo));
            let linked_item = photo
                .item_id
                .and_then(|id| record.find_item(id))
                .map(|(area, item)| format!("{} / {}", area.label(), item.name));
            let mut source = format!("Imagem: {}", photo.image.value());
            if let Some(item) = linked_item {
                source.push_str(&format!(" - Item: {item}"));
            }
            sheet.note(&source);
            sheet.gap(1.0);
        }
    }

    if !record.comments.is_empty() {
        sheet.heading("Comentários");
        for comment in record.comments_newest_first() {
            sheet.field(
                &comment.author,
                &format!("{} ({})", comment.body, comment.created_at.format(DATE_TIME_FORMAT)),
            );
        }
    }

    sheet
}

/// PDF bytes of the detailed report of `record`.
pub fn render_inspection_pdf(record: &InspectionRecord) -> Result<Vec<u8>, ExportError> {
    let sheet = compose_inspection_sheet(record);
    render_sheet(&sheet, &format!("Relatório de Vistoria - {}", record.project_name))
}

//! Sample inspections used to seed the in-memory store and in tests.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::geo::GeoPoint;
use crate::inspection::{
    ChecklistItem, ChecklistStatus, Comment, ImageRef, InspectionRecord, InspectionStatus, Photo,
};
use crate::types::{DbId, InspectionDate, Timestamp};

fn day(y: i32, m: u32, d: u32) -> InspectionDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

fn item(id: DbId, name: &str, status: ChecklistStatus, notes: &str) -> ChecklistItem {
    ChecklistItem {
        id,
        name: name.to_string(),
        description: None,
        status,
        notes: notes.to_string(),
    }
}

fn comment(id: DbId, author: &str, body: &str, created_at: Timestamp) -> Comment {
    Comment {
        id,
        author: author.to_string(),
        body: body.to_string(),
        created_at,
    }
}

/// Two inspections: one in progress with everything pending, one completed
/// with a plumbing non-conformity documented by a geotagged photo.
pub fn sample_inspections() -> Vec<InspectionRecord> {
    let first_created = at(2024, 7, 20, 8, 30);
    let second_created = at(2024, 7, 18, 8, 0);

    vec![
        InspectionRecord {
            id: 1,
            project_name: "Obra Residencial #1".into(),
            address: "Av. Paulista, 1001 - São Paulo/SP".into(),
            date: day(2024, 7, 20),
            status: InspectionStatus::InProgress,
            responsible: "João Silva".into(),
            general_notes: "Iniciando a vistoria.".into(),
            structural: vec![item(1, "Fundações", ChecklistStatus::Pending, "")],
            plumbing: vec![item(2, "Tubulação", ChecklistStatus::Pending, "")],
            electrical: vec![item(3, "Quadro Geral", ChecklistStatus::Pending, "")],
            photos: Vec::new(),
            comments: vec![comment(
                1,
                "Eng. Maria",
                "Início da vistoria. Tudo parece em ordem.",
                at(2024, 7, 20, 9, 0),
            )],
            created_at: first_created,
            updated_at: first_created,
        },
        InspectionRecord {
            id: 2,
            project_name: "Edifício Comercial Central".into(),
            address: "Rua da Consolação, 500 - São Paulo/SP".into(),
            date: day(2024, 7, 18),
            status: InspectionStatus::Completed,
            responsible: "Maria Oliveira".into(),
            general_notes: "Vistoria finalizada com sucesso. Pequenos reparos na hidráulica recomendados."
                .into(),
            structural: vec![item(4, "Fundações", ChecklistStatus::Approved, "OK")],
            plumbing: vec![item(
                5,
                "Encanamento",
                ChecklistStatus::Rejected,
                "Vazamento no banheiro do 2º andar.",
            )],
            electrical: vec![item(6, "Quadro de Força", ChecklistStatus::Approved, "OK")],
            photos: vec![Photo {
                id: 1,
                caption: "Vazamento encontrado".into(),
                image: ImageRef::Url("https://picsum.photos/seed/vazamento/400/300".into()),
                location: Some(GeoPoint {
                    latitude: -23.54,
                    longitude: -46.64,
                }),
                taken_at: at(2024, 7, 18, 14, 30),
                item_id: Some(5),
            }],
            comments: vec![
                comment(
                    2,
                    "Eng. Maria",
                    "Encontrado vazamento na hidráulica. Foto anexada.",
                    at(2024, 7, 18, 14, 32),
                ),
                comment(
                    3,
                    "Eng. João",
                    "Reparo agendado para amanhã.",
                    at(2024, 7, 18, 16, 0),
                ),
            ],
            created_at: second_created,
            updated_at: second_created,
        },
    ]
}

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::entities::student;
use crate::error::{AppError, AppResult};
use crate::repositories::{EventRegistrationRepository, EventRepository, FestRepository};

const PAGE_WIDTH: i64 = 842;
const PAGE_HEIGHT: i64 = 595;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateData {
    pub student_name: String,
    pub event_name: String,
    pub fest_name: Option<String>,
    pub event_date: NaiveDate,
    pub issued_on: NaiveDate,
}

#[derive(Debug, thiserror::Error)]
pub enum CertificateError {
    #[error("failed to render certificate: {0}")]
    Render(String),
}

impl From<CertificateError> for AppError {
    fn from(err: CertificateError) -> Self {
        AppError::Certificate(err.to_string())
    }
}

pub trait CertificateRenderer: Send + Sync {
    fn render(&self, data: &CertificateData) -> Result<Vec<u8>, CertificateError>;
}

/// Single page A4 landscape participation certificate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfCertificateRenderer;

struct Line {
    text: String,
    font: &'static str,
    size: i64,
    /// Distance from the previous line's baseline.
    gap: i64,
}

impl PdfCertificateRenderer {
    fn lines(data: &CertificateData) -> Vec<Line> {
        let event_line = match &data.fest_name {
            Some(fest) => format!("{} ({})", data.event_name, fest),
            None => data.event_name.clone(),
        };

        vec![
            Line {
                text: "Certificate of Participation".to_string(),
                font: "F2",
                size: 32,
                gap: 0,
            },
            Line {
                text: "This is to certify that".to_string(),
                font: "F1",
                size: 16,
                gap: 70,
            },
            Line {
                text: data.student_name.clone(),
                font: "F2",
                size: 24,
                gap: 45,
            },
            Line {
                text: "has participated in the event".to_string(),
                font: "F1",
                size: 16,
                gap: 45,
            },
            Line {
                text: event_line,
                font: "F2",
                size: 20,
                gap: 40,
            },
            Line {
                text: format!("held on {}.", data.event_date.format("%Y-%m-%d")),
                font: "F1",
                size: 16,
                gap: 35,
            },
            Line {
                text: format!("Date of Issue: {}", data.issued_on.format("%Y-%m-%d")),
                font: "F3",
                size: 12,
                gap: 70,
            },
            Line {
                text: "Unbound Platform".to_string(),
                font: "F2",
                size: 14,
                gap: 40,
            },
        ]
    }

    fn content(data: &CertificateData) -> Content {
        let mut operations = Vec::new();
        let mut y = PAGE_HEIGHT - 120;

        for line in Self::lines(data) {
            y -= line.gap;
            // Helvetica averages roughly half an em per glyph.
            let approx_width = line.text.chars().count() as i64 * line.size / 2;
            let x = ((PAGE_WIDTH - approx_width) / 2).max(40);

            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![
                    Object::Name(line.font.as_bytes().to_vec()),
                    Object::Integer(line.size),
                ],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Integer(x), Object::Integer(y)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line.text)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        Content { operations }
    }
}

impl CertificateRenderer for PdfCertificateRenderer {
    fn render(&self, data: &CertificateData) -> Result<Vec<u8>, CertificateError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let italic = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Oblique",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
                "F3" => italic,
            },
        });

        let encoded = Self::content(data)
            .encode()
            .map_err(|e| CertificateError::Render(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| CertificateError::Render(e.to_string()))?;

        Ok(buffer)
    }
}

#[derive(Debug)]
pub struct IssuedCertificate {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Checks every certificate precondition for `student` and renders the document.
pub async fn issue_certificate<C: ConnectionTrait>(
    db: &C,
    renderer: &dyn CertificateRenderer,
    student: &student::Model,
    event_id: Uuid,
    today: NaiveDate,
) -> AppResult<IssuedCertificate> {
    let event = EventRepository::new(db)
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;

    let registration = EventRegistrationRepository::new(db)
        .find_by_event_and_student(event.id, student.id)
        .await?
        .filter(|registration| registration.is_settled(event.fees))
        .ok_or_else(|| {
            AppError::forbidden(
                "You must be a registered and paid participant to download certificate",
            )
        })?;

    if !registration.certificate_approved {
        return Err(AppError::forbidden("Certificate not yet approved by college"));
    }

    if today <= event.event_date {
        return Err(AppError::forbidden(
            "Certificate available only after event completion",
        ));
    }

    let fest_name = match event.fest_id {
        Some(fest_id) => FestRepository::new(db)
            .find_by_id(fest_id)
            .await?
            .map(|fest| fest.name),
        None => None,
    };

    let data = CertificateData {
        student_name: student.name.clone(),
        event_name: event.name.clone(),
        fest_name,
        event_date: event.event_date,
        issued_on: today,
    };
    let bytes = renderer.render(&data)?;

    tracing::info!(
        event_id = %event.id,
        student_id = %student.id,
        "Certificate issued"
    );

    Ok(IssuedCertificate {
        file_name: format!("certificate_{}_{}.pdf", event.id, student.id),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CertificateData {
        CertificateData {
            student_name: "Asha Rao".to_string(),
            event_name: "Code Sprint".to_string(),
            fest_name: Some("TechNova".to_string()),
            event_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            issued_on: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
        }
    }

    #[test]
    fn test_render_produces_pdf() {
        let bytes = PdfCertificateRenderer.render(&sample()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_lines_include_fest_and_dates() {
        let texts: Vec<String> = PdfCertificateRenderer::lines(&sample())
            .into_iter()
            .map(|line| line.text)
            .collect();

        assert!(texts.contains(&"Asha Rao".to_string()));
        assert!(texts.contains(&"Code Sprint (TechNova)".to_string()));
        assert!(texts.contains(&"held on 2025-01-15.".to_string()));
        assert!(texts.contains(&"Date of Issue: 2025-01-20".to_string()));
    }

    #[test]
    fn test_lines_without_fest() {
        let mut data = sample();
        data.fest_name = None;

        let texts: Vec<String> = PdfCertificateRenderer::lines(&data)
            .into_iter()
            .map(|line| line.text)
            .collect();
        assert!(texts.contains(&"Code Sprint".to_string()));
    }
}

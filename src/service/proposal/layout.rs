use super::document::{Align, DocumentBuilder, FontFace, ProposalDocument, Shade, TableRow, TextStyle};
use super::format::{format_date_id, format_number, format_rupiah};
use crate::config::SolarConstants;
use crate::error::InputError;
use crate::models::{EconomicsResult, ProposalRequest};

const TITLE: &str = "PROPOSAL ESTIMASI KEBUTUHAN PLTS ATAP";
const COMPANY: &str = "PT. TOBA ENERGI NUSAJAYA";
const COMPANY_CITY: &str = "Bogor";
const COMPANY_CONTACT: &str =
    "Jl. Raya Kertamaya No.1, Bogor, Jawa Barat | Phone: +62 853-7071-6686 | info@tobaenergi.com";

const BANNER: TextStyle = TextStyle::new(FontFace::Bold, 16.0);
const HEADING: TextStyle = TextStyle::new(FontFace::Bold, 12.0);
const SALUTATION: TextStyle = TextStyle::new(FontFace::Regular, 11.0);
const BODY: TextStyle = TextStyle::new(FontFace::Regular, 10.0);
const BODY_BOLD: TextStyle = TextStyle::new(FontFace::Bold, 10.0);
const FOOTNOTE: TextStyle = TextStyle::new(FontFace::Italic, 9.0);
const FOOTER: TextStyle = TextStyle::new(FontFace::Italic, 8.0);

const BANNER_FILL: Shade = Shade(230, 230, 230);

/// 表格列宽 (mm)
const LABEL_WIDTH: f32 = 60.0;
const VALUE_WIDTH: f32 = 110.0;
const ROW_HEIGHT: f32 = 6.0;

/// 提案渲染器
#[derive(Debug, Clone)]
pub struct ProposalRenderer {
    constants: SolarConstants,
}

impl ProposalRenderer {
    pub fn new(constants: SolarConstants) -> Self {
        Self { constants }
    }

    /// 生成两页提案; results 非 success 时直接拒绝, 不产生任何页面
    pub fn render(&self, request: &ProposalRequest) -> Result<ProposalDocument, InputError> {
        let r = request.successful_results()?;

        let doc = ProposalDocument::builder(TITLE).page();
        let doc = self.summary_page(doc, request, r);
        let doc = notes_page(doc.page());
        Ok(doc.build())
    }

    fn summary_page(
        &self,
        doc: DocumentBuilder,
        request: &ProposalRequest,
        r: &EconomicsResult,
    ) -> DocumentBuilder {
        let loss_pct = (r.loss_factor * 100.0).trunc() as i64;

        let mut doc = doc.banner(TITLE, BANNER, 10.0, BANNER_FILL).gap(5.0);
        if let Some(date) = request.issued_on {
            doc = doc.aligned_line(
                &format!("{}, {}", COMPANY_CITY, format_date_id(date)),
                BODY,
                5.0,
                Align::Right,
            );
        }

        doc.line(&format!("Yth. {}", request.customer_name), SALUTATION, 5.0)
            .line(&format!("di {}", request.coordinates_display), SALUTATION, 5.0)
            .gap(5.0)
            .paragraph(
                "Terima kasih atas ketertarikan Bapak/Ibu terhadap solusi Pembangkit Listrik Tenaga Surya (PLTS) Atap \
                 yang kami tawarkan. Kami menghargai kesempatan untuk membantu menganalisa kebutuhan energi dan \
                 potensi penghematan listrik di properti Bapak/Ibu.",
                BODY,
                5.0,
            )
            .gap(2.0)
            .paragraph(
                &format!(
                    "Berdasarkan data input tagihan {} yang setara dengan konsumsi listrik sebesar {} kWh per bulan, \
                     serta target penghematan sekitar {}%, kami telah melakukan perhitungan teknis menggunakan nilai \
                     irradiance dari PVGIS.",
                    format_rupiah(request.monthly_bill_rp),
                    format_number(r.monthly_energy_need_kwh, 2),
                    request.savings_target_pct.trunc() as i64,
                ),
                BODY,
                5.0,
            )
            .gap(2.0)
            .paragraph(
                &format!(
                    "Nilai PVOUT lokasi adalah {} kWh/kWp per bulan (nilai ini sudah mempertimbangkan Performance \
                     Ratio/Loss Factor {}%), yang menjadi dasar penentuan estimasi kapasitas PLTS.",
                    format_number(r.pvout_effective_monthly, 4),
                    loss_pct,
                ),
                BODY,
                5.0,
            )
            .gap(5.0)
            .line("HASIL ESTIMASI TEKNIS DAN FINANSIAL", HEADING, 7.0)
            .gap(2.0)
            .row(table_row("Kapasitas PLTS yang Dibutuhkan:", &format!("{} kWp", format_number(r.system_size_kwp, 2)), true))
            .row(table_row(
                &format!("Jumlah Panel {} Wp:", format_number(self.constants.panel_watt_peak, 0)),
                &format!("{} keping", r.panel_count),
                false,
            ))
            .row(table_row("Estimasi Area Atap:", &format!("{} m2", format_number(r.roof_area_m2, 2)), false))
            .row(table_row("Total Investasi Estimasi:", &format_rupiah(r.total_investment_rp), true))
            .gap(5.0)
            .paragraph(
                &format!(
                    "Dengan kapasitas tersebut, sistem PLTS diperkirakan mampu menghasilkan energi sekitar {} kWh per \
                     bulan, sehingga dapat memberikan potensi penghematan sebagai berikut:",
                    format_number(r.monthly_production_kwh, 4),
                ),
                BODY,
                5.0,
            )
            .gap(2.0)
            .row(table_row("Penghematan Bulanan (Uang):", &format_rupiah(r.monthly_savings_rp()), false))
            .row(table_row("Penghematan Tahunan (Uang):", &format_rupiah(r.annual_savings_rp), false))
            .row(table_row("Perkiraan Waktu Balik Modal (BEP):", &format!("{} tahun", r.payback_years), true))
            .gap(5.0)
            .paragraph(
                &format!(
                    "Perhitungan ini merujuk pada tarif listrik saat ini yaitu {} per kWh dan PVOUT tahunan sebesar {} \
                     kWh/kWp/year.",
                    format_rupiah(r.tariff_used),
                    format_number(r.pvout_annual, 1),
                ),
                FOOTNOTE,
                4.0,
            )
    }
}

fn notes_page(doc: DocumentBuilder) -> DocumentBuilder {
    doc.line("CATATAN PENTING", HEADING, 7.0)
        .gap(2.0)
        .paragraph(
            "1. Nilai PVOUT pada simulasi ini bersumber dari PVGIS (JRC), sehingga hasil estimasi produksi energi \
             memiliki tingkat keandalan yang baik.",
            BODY,
            5.0,
        )
        .gap(2.0)
        .paragraph(
            "2. Estimasi total investasi pada simulasi ini menggunakan pendekatan linier. Namun, dalam praktiknya \
             harga aktual sering kali lebih rendah pada kapasitas yang lebih besar karena efisiensi skala.",
            BODY,
            5.0,
        )
        .gap(2.0)
        .paragraph(
            "Sehingga simulasi ini dapat digunakan sebagai referensi awal yang baik, dan nilai final akan disesuaikan \
             pada saat penyusunan penawaran resmi.",
            BODY,
            5.0,
        )
        .gap(10.0)
        .paragraph(
            "Kami siap membantu Bapak/Ibu dalam diskusi lanjutan mengenai opsi kapasitas, konfigurasi teknis, dan \
             penawaran resmi.",
            BODY,
            5.0,
        )
        .gap(5.0)
        .line("Terima kasih atas perhatian dan kepercayaan Bapak/Ibu.", BODY, 5.0)
        .gap(5.0)
        .line("Hormat kami,", BODY, 5.0)
        .gap(2.0)
        .line(COMPANY, BODY_BOLD, 5.0)
        .footer(COMPANY_CONTACT, FOOTER, 20.0)
}

fn table_row(label: &str, value: &str, bold_label: bool) -> TableRow {
    TableRow {
        label: label.to_string(),
        value: value.to_string(),
        label_width: LABEL_WIDTH,
        value_width: VALUE_WIDTH,
        height: ROW_HEIGHT,
        label_style: if bold_label { BODY_BOLD } else { BODY },
        value_style: BODY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EconomicsInput, EconomicsOutcome};
    use crate::service::EconomicsCalculator;
    use chrono::NaiveDate;

    fn request(name: &str) -> ProposalRequest {
        let calc = EconomicsCalculator::new(SolarConstants::default());
        let results = calc
            .compute(&EconomicsInput {
                annual_yield: 1400.0,
                monthly_bill_rp: 1_000_000.0,
                tariff_rp_per_kwh: Some(1699.53),
                savings_target_pct: 100.0,
            })
            .unwrap();
        ProposalRequest {
            customer_name: name.to_string(),
            coordinates_display: "-6.595, 106.816".to_string(),
            monthly_bill_rp: 1_000_000.0,
            savings_target_pct: 100.0,
            results: Some(EconomicsOutcome::Success(results)),
            issued_on: NaiveDate::from_ymd_opt(2026, 10, 18),
        }
    }

    fn renderer() -> ProposalRenderer {
        ProposalRenderer::new(SolarConstants::default())
    }

    #[test]
    fn lays_out_two_pages() {
        let doc = renderer().render(&request("Budi Santoso")).unwrap();
        assert_eq!(doc.pages.len(), 2);

        let texts: Vec<&str> = doc.texts().collect();
        assert_eq!(texts[0], TITLE);
        assert!(texts.contains(&"Bogor, 18 Oktober 2026"));
        assert!(texts.contains(&"Yth. Budi Santoso"));
        assert!(texts.contains(&"Jumlah Panel 550 Wp:"));
        assert!(texts.contains(&"11 keping"));
        assert!(texts.contains(&"7.42 tahun"));
        assert!(texts.contains(&"Rp 1.000.000"), "monthly savings row");
        assert!(texts.iter().any(|t| t.contains("tagihan Rp 1.000.000") && t.contains("588.40 kWh")));
        assert!(texts.iter().any(|t| t.contains("Loss Factor 85%")));
        assert!(texts.iter().any(|t| t.contains("Rp 1.700 per kWh") && t.contains("1,400.0 kWh/kWp/year")));

        let page_two: Vec<&str> = doc.pages[1].ops.iter().flat_map(|op| op.texts()).collect();
        assert_eq!(page_two[0], "CATATAN PENTING");
        assert!(page_two.contains(&COMPANY));
        assert_eq!(page_two.last(), Some(&COMPANY_CONTACT));
    }

    #[test]
    fn rejects_failed_results() {
        let mut req = request("Budi");
        req.results = Some(EconomicsOutcome::Failed { message: "gagal".into() });
        assert_eq!(renderer().render(&req), Err(InputError::InvalidResults));

        req.results = None;
        assert_eq!(renderer().render(&req), Err(InputError::InvalidResults));
    }

    #[test]
    fn non_latin_names_are_replaced_not_rejected() {
        let doc = renderer().render(&request("李雷 Ærøskøbing")).unwrap();
        assert!(doc.texts().any(|t| t == "Yth. ?? Ærøskøbing"));
        assert!(doc.to_pdf().is_ok());
    }

    #[test]
    fn loss_factor_percentage_is_truncated() {
        let mut req = request("Budi");
        if let Some(EconomicsOutcome::Success(r)) = req.results.as_mut() {
            r.loss_factor = 0.859;
        }
        let doc = renderer().render(&req).unwrap();
        assert!(doc.texts().any(|t| t.contains("Loss Factor 85%")));
    }

    #[test]
    fn whole_year_payback_keeps_decimal() {
        let mut req = request("Budi");
        if let Some(EconomicsOutcome::Success(r)) = req.results.as_mut() {
            r.payback_years = crate::models::Payback::Years(7.0);
        }
        let doc = renderer().render(&req).unwrap();
        assert!(doc.texts().any(|t| t == "7.0 tahun"));
    }

    #[test]
    fn omits_date_when_not_given() {
        let mut req = request("Budi");
        req.issued_on = None;
        let doc = renderer().render(&req).unwrap();
        assert!(!doc.texts().any(|t| t.starts_with("Bogor,")));
    }
}

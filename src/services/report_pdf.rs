// src/services/report_pdf.rs
//
// Exporta o resumo mensal consolidado em PDF para impressão/arquivo.

use genpdf::{Element, elements, style};

use crate::{common::error::AppError, common::money::format_cents, models::reports::MonthlySummary};

/// Gera o PDF do resumo mensal em memória.
/// As fontes são carregadas da pasta `./fonts` (Roboto).
pub fn build_monthly_summary_pdf(
    summaries: &[MonthlySummary],
    store_label: &str,
) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
        .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title("Resumo Mensal - TOP Vistorias");
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    doc.push(
        elements::Paragraph::new("TOP VISTORIAS")
            .styled(style::Style::new().bold().with_font_size(18)),
    );
    doc.push(
        elements::Paragraph::new(format!("Resumo Mensal — {}", store_label))
            .styled(style::Style::new().with_font_size(12)),
    );
    doc.push(elements::Break::new(1.5));

    // Pesos das colunas: Mês (3), Bruto (2), Despesas (2), Fixas (2), Líquido (2)
    let mut table = elements::TableLayout::new(vec![3, 2, 2, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let style_bold = style::Style::new().bold();
    table
        .row()
        .element(elements::Paragraph::new("Mês").styled(style_bold))
        .element(elements::Paragraph::new("Bruto").styled(style_bold))
        .element(elements::Paragraph::new("Despesas").styled(style_bold))
        .element(elements::Paragraph::new("Fixas").styled(style_bold))
        .element(elements::Paragraph::new("Líquido Final").styled(style_bold))
        .push()
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    for summary in summaries {
        table
            .row()
            .element(elements::Paragraph::new(summary.month_label.clone()))
            .element(elements::Paragraph::new(format_cents(summary.gross)))
            .element(elements::Paragraph::new(format_cents(summary.expenses_total)))
            .element(elements::Paragraph::new(format_cents(summary.fixed_expenses)))
            .element(elements::Paragraph::new(format_cents(summary.net_after_fixed)))
            .push()
            .map_err(|e| AppError::PdfError(e.to_string()))?;
    }

    doc.push(table);
    doc.push(elements::Break::new(2));

    let total_net: i64 = summaries.iter().map(|s| s.net_after_fixed).sum();
    let mut total_paragraph =
        elements::Paragraph::new(format!("RESULTADO DO PERÍODO: {}", format_cents(total_net)));
    total_paragraph.set_alignment(genpdf::Alignment::Right);
    doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    Ok(buffer)
}

// src/common/money.rs
//
// Fronteira de formatação monetária: todo valor atravessa a aplicação como
// centavos inteiros (i64). O contrato aqui é `parse_cents(format_cents(x)) == x`
// para qualquer número inteiro de centavos.

/// Formata centavos como moeda brasileira: 123456 -> "R$ 1.234,56".
pub fn format_cents(cents: i64) -> String {
    let negative = cents < 0;
    let abs = cents.unsigned_abs();
    let reais = abs / 100;
    let centavos = abs % 100;

    // Agrupa os milhares com ponto, da direita para a esquerda.
    let digits = reais.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, centavos)
}

/// Converte uma string de moeda brasileira de volta para centavos.
/// Aceita o que `format_cents` produz e variações digitadas ("1234,56", "R$12").
pub fn parse_cents(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    let negative = trimmed.starts_with('-');
    let cleaned: String = trimmed
        .trim_start_matches('-')
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let (reais_part, centavos_part) = match cleaned.split_once(',') {
        Some((r, c)) => (r, c),
        None => (cleaned.as_str(), ""),
    };

    let reais: i64 = if reais_part.is_empty() {
        0
    } else {
        reais_part.parse().ok()?
    };

    let centavos: i64 = match centavos_part.len() {
        0 => 0,
        // "1,5" significa 50 centavos
        1 => centavos_part.parse::<i64>().ok()? * 10,
        2 => centavos_part.parse().ok()?,
        _ => return None,
    };

    let total = reais.checked_mul(100)?.checked_add(centavos)?;
    Some(if negative { -total } else { total })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formata_valores_simples() {
        assert_eq!(format_cents(0), "R$ 0,00");
        assert_eq!(format_cents(5), "R$ 0,05");
        assert_eq!(format_cents(12000), "R$ 120,00");
        assert_eq!(format_cents(123456), "R$ 1.234,56");
        assert_eq!(format_cents(100000000), "R$ 1.000.000,00");
    }

    #[test]
    fn formata_valores_negativos() {
        assert_eq!(format_cents(-9950), "-R$ 99,50");
    }

    #[test]
    fn parse_aceita_variacoes() {
        assert_eq!(parse_cents("R$ 1.234,56"), Some(123456));
        assert_eq!(parse_cents("1234,56"), Some(123456));
        assert_eq!(parse_cents("R$12"), Some(1200));
        assert_eq!(parse_cents("0,5"), Some(50));
        assert_eq!(parse_cents("abc"), None);
        assert_eq!(parse_cents(""), None);
    }

    #[test]
    fn round_trip_parse_format() {
        for cents in [0i64, 1, 99, 100, 101, 9999, 10000, 123456, -123456, 987654321] {
            assert_eq!(parse_cents(&format_cents(cents)), Some(cents));
        }
    }
}

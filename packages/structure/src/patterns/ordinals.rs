//! Ordinal vocabulary: Arabic, English and Roman surface forms for 1–100.
//!
//! Values above [`MAX_WORD_ORDINAL`] only exist as digits.

use crate::types::HeaderKind;

/// Highest value that has word forms.
pub const MAX_WORD_ORDINAL: u16 = 100;

const AR_MASCULINE: [&str; 10] = [
    "الأول", "الثاني", "الثالث", "الرابع", "الخامس", "السادس", "السابع", "الثامن", "التاسع",
    "العاشر",
];

const AR_FEMININE: [&str; 10] = [
    "الأولى", "الثانية", "الثالثة", "الرابعة", "الخامسة", "السادسة", "السابعة", "الثامنة",
    "التاسعة", "العاشرة",
];

/// Decades 20..=90 as (nominative, oblique).
const AR_TENS: [(&str, &str); 8] = [
    ("العشرون", "العشرين"),
    ("الثلاثون", "الثلاثين"),
    ("الأربعون", "الأربعين"),
    ("الخمسون", "الخمسين"),
    ("الستون", "الستين"),
    ("السبعون", "السبعين"),
    ("الثمانون", "الثمانين"),
    ("التسعون", "التسعين"),
];

const AR_HUNDRED: [&str; 2] = ["المائة", "المئة"];

const EN_CARDINAL: [&str; 19] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
];

const EN_ORDINAL: [&str; 19] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
    "tenth", "eleventh", "twelfth", "thirteenth", "fourteenth", "fifteenth", "sixteenth",
    "seventeenth", "eighteenth", "nineteenth",
];

const EN_TENS_CARDINAL: [&str; 8] = [
    "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const EN_TENS_ORDINAL: [&str; 8] = [
    "twentieth", "thirtieth", "fortieth", "fiftieth", "sixtieth", "seventieth", "eightieth",
    "ninetieth",
];

/// Masculine unit used inside compounds ("الحادي عشر", "الحادي والعشرون").
fn ar_compound_masculine(unit: usize) -> &'static str {
    if unit == 1 {
        "الحادي"
    } else {
        AR_MASCULINE[unit - 1]
    }
}

fn ar_compound_feminine(unit: usize) -> &'static str {
    if unit == 1 {
        "الحادية"
    } else {
        AR_FEMININE[unit - 1]
    }
}

fn arabic_forms(value: u16) -> Vec<String> {
    let n = usize::from(value);
    match n {
        1..=10 => vec![AR_MASCULINE[n - 1].to_string(), AR_FEMININE[n - 1].to_string()],
        11..=19 => {
            let unit = n - 10;
            vec![
                format!("{} عشر", ar_compound_masculine(unit)),
                format!("{} عشرة", ar_compound_feminine(unit)),
                // Common in practice even though grammatically off
                format!("{} عشر", ar_compound_feminine(unit)),
            ]
        }
        20..=99 => {
            let (nominative, oblique) = AR_TENS[n / 10 - 2];
            let unit = n % 10;
            if unit == 0 {
                return vec![nominative.to_string(), oblique.to_string()];
            }
            let mut forms = Vec::new();
            for head in [ar_compound_masculine(unit), ar_compound_feminine(unit)] {
                for tens in [nominative, oblique] {
                    forms.push(format!("{head} و{tens}"));
                    forms.push(format!("{head} و {tens}"));
                }
            }
            forms
        }
        100 => AR_HUNDRED.iter().map(ToString::to_string).collect(),
        _ => Vec::new(),
    }
}

fn english_forms(value: u16) -> Vec<String> {
    let n = usize::from(value);
    match n {
        1..=19 => vec![EN_CARDINAL[n - 1].to_string(), EN_ORDINAL[n - 1].to_string()],
        20..=99 => {
            let tens = n / 10 - 2;
            let unit = n % 10;
            if unit == 0 {
                return vec![
                    EN_TENS_CARDINAL[tens].to_string(),
                    EN_TENS_ORDINAL[tens].to_string(),
                ];
            }
            let mut forms = Vec::new();
            for sep in ["-", " "] {
                forms.push(format!("{}{sep}{}", EN_TENS_CARDINAL[tens], EN_CARDINAL[unit - 1]));
                forms.push(format!("{}{sep}{}", EN_TENS_CARDINAL[tens], EN_ORDINAL[unit - 1]));
            }
            forms
        }
        100 => vec![
            "one hundred".to_string(),
            "hundred".to_string(),
            "one hundredth".to_string(),
            "hundredth".to_string(),
        ],
        _ => Vec::new(),
    }
}

/// Lowercase Roman numeral for `value`.
///
/// # Examples
/// ```
/// use statute_structure::patterns::roman_numeral;
///
/// assert_eq!(roman_numeral(14), "xiv");
/// assert_eq!(roman_numeral(99), "xcix");
/// ```
#[must_use]
pub fn roman_numeral(value: u16) -> String {
    const TABLE: [(u16, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut rest = value;
    let mut out = String::new();
    for (amount, symbol) in TABLE {
        while rest >= amount {
            out.push_str(symbol);
            rest -= amount;
        }
    }
    out
}

/// Every word surface form registered for `value`, Arabic first.
///
/// Includes the digit form. Empty words beyond [`MAX_WORD_ORDINAL`] leave
/// only the digits.
#[must_use]
pub fn surface_forms(value: u16) -> Vec<String> {
    let mut forms = arabic_forms(value);
    forms.extend(english_forms(value));
    if (1..=MAX_WORD_ORDINAL).contains(&value) {
        forms.push(roman_numeral(value));
    }
    forms.push(value.to_string());

    let mut seen = std::collections::HashSet::new();
    forms.retain(|form| seen.insert(form.clone()));
    forms
}

/// Canonical ordinal text for a kind: feminine Arabic for articles (المادة is
/// feminine), masculine otherwise, digits when no word form exists.
#[must_use]
pub fn canonical_text(kind: HeaderKind, value: u16) -> String {
    let forms = arabic_forms(value);
    let pick = match (kind, usize::from(value)) {
        (HeaderKind::Article, 1..=10) => forms.get(1),
        (HeaderKind::Article, 11..=19) => forms.get(1),
        (HeaderKind::Article, 21..=99) if value % 10 != 0 => forms.get(4),
        _ => forms.first(),
    };
    pick.cloned().unwrap_or_else(|| value.to_string())
}

//! Vietnamese wording for currency amounts.
//!
//! `to_words("1.250.000") == "Một triệu hai trăm năm mươi nghìn đồng"`.
//!
//! # Reading rules
//!
//! The amount is split into base-1000 groups. Each nonzero group is read as
//! hundreds, tens, units and followed by its magnitude word:
//!
//! - hundreds are read only when nonzero ("ba trăm")
//! - `linh` joins a nonzero unit to a spoken hundreds digit across a zero
//!   tens digit ("một trăm linh năm"), and to the higher groups when the
//!   lowest group is below ten ("một nghìn linh năm")
//! - tens digit 1 reads "mười", 2..9 read "<digit> mươi"
//! - unit 1 after tens 2..9 reads "mốt"; unit 5 after any nonzero tens reads
//!   "lăm"
//!
//! Zero groups contribute nothing, magnitude word included.

const DIGITS: [&str; 10] = [
    "không", "một", "hai", "ba", "bốn", "năm", "sáu", "bảy", "tám", "chín",
];

const MAGNITUDES: [&str; 6] = ["", "nghìn", "triệu", "tỷ", "nghìn tỷ", "triệu tỷ"];

/// Largest amount with a magnitude word for every group.
pub const MAX_AMOUNT: u64 = 999_999_999_999_999_999;

const ZERO_PHRASE: &str = "Không đồng";
const CURRENCY: &str = "đồng";

/// Convert a formatted amount to its Vietnamese currency phrase.
///
/// Grouping separators (`.`, `,`, spaces, `_`) are ignored. Anything else
/// that is not an ASCII digit, an empty amount, or an amount above
/// [`MAX_AMOUNT`] yields an empty string.
pub fn to_words(amount: &str) -> String {
    let Some(value) = parse_amount(amount) else {
        return String::new();
    };
    if value == 0 {
        return ZERO_PHRASE.to_string();
    }

    let mut groups = Vec::with_capacity(MAGNITUDES.len());
    let mut rest = value;
    while rest > 0 {
        groups.push((rest % 1000) as u16);
        rest /= 1000;
    }

    let highest = groups.len() - 1;
    let mut words: Vec<String> = Vec::new();
    for (position, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        let link_to_higher = position == 0 && highest > 0;
        words.push(read_group(group, link_to_higher));
        if !MAGNITUDES[position].is_empty() {
            words.push(MAGNITUDES[position].to_string());
        }
    }

    format!("{} {CURRENCY}", capitalize_first(&words.join(" ")))
}

/// Format digits with `.` thousands separators: `"1234567"` → `"1.234.567"`.
///
/// Every non-digit character is dropped first, so already-formatted input is
/// reformatted rather than doubled up.
pub fn format_currency(value: &str) -> String {
    let digits: Vec<char> = value.chars().filter(|c| c.is_ascii_digit()).collect();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(*c);
    }
    out
}

fn parse_amount(amount: &str) -> Option<u64> {
    let digits: String = amount
        .trim()
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '_') && !c.is_whitespace())
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok().filter(|v| *v <= MAX_AMOUNT)
}

/// Read one base-1000 group (1..=999).
fn read_group(group: u16, link_to_higher: bool) -> String {
    let hundreds = (group / 100) as usize;
    let tens = ((group % 100) / 10) as usize;
    let units = (group % 10) as usize;

    let mut words: Vec<&str> = Vec::with_capacity(5);

    if hundreds > 0 {
        words.push(DIGITS[hundreds]);
        words.push("trăm");
    }
    if tens == 0 && units != 0 && (hundreds > 0 || link_to_higher) {
        words.push("linh");
    }

    match tens {
        0 => {}
        1 => words.push("mười"),
        t => {
            words.push(DIGITS[t]);
            words.push("mươi");
        }
    }

    match units {
        0 => {}
        1 if tens >= 2 => words.push("mốt"),
        5 if tens >= 1 => words.push("lăm"),
        u => words.push(DIGITS[u]),
    }

    words.join(" ")
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

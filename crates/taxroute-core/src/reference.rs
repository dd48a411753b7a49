//! Tax-agency reference excerpts for the semantic matcher.
//!
//! The full agency table is large, so only the block for the province named
//! in the address is sent along with it. Province keys are literal lowercase
//! Vietnamese names, matched by containment against the lowercased address
//! with diacritics kept. Several keys may share one block ("huế" and
//! "thừa thiên huế").

use once_cell::sync::Lazy;
use unicode_normalization::UnicodeNormalization;

/// Header row shared by every excerpt.
pub const AGENCY_HEADER: &str = "Mã cơ quan thu ,Tên cơ quan thu";

macro_rules! agency_block {
    ($file:literal) => {
        include_str!(concat!("../data/agencies/", $file, ".csv"))
    };
}

const HA_NOI: &str = agency_block!("ha_noi");
const HO_CHI_MINH: &str = agency_block!("ho_chi_minh");
const HUE: &str = agency_block!("hue");
const KHANH_HOA: &str = agency_block!("khanh_hoa");
const THANH_HOA: &str = agency_block!("thanh_hoa");

/// Province key → agency rows, in match priority order.
const PROVINCE_BLOCKS: &[(&str, &str)] = &[
    ("an giang", agency_block!("an_giang")),
    ("bắc ninh", agency_block!("bac_ninh")),
    ("cà mau", agency_block!("ca_mau")),
    ("cao bằng", agency_block!("cao_bang")),
    ("cần thơ", agency_block!("can_tho")),
    ("đà nẵng", agency_block!("da_nang")),
    ("đắk lắk", agency_block!("dak_lak")),
    ("điện biên", agency_block!("dien_bien")),
    ("đồng nai", agency_block!("dong_nai")),
    ("đồng tháp", agency_block!("dong_thap")),
    ("gia lai", agency_block!("gia_lai")),
    ("hà nội", HA_NOI),
    ("hà tĩnh", agency_block!("ha_tinh")),
    ("hải phòng", agency_block!("hai_phong")),
    ("hồ chí minh", HO_CHI_MINH),
    ("huế", HUE),
    ("thừa thiên huế", HUE),
    ("hưng yên", agency_block!("hung_yen")),
    ("khánh hòa", KHANH_HOA),
    ("khánh hoà", KHANH_HOA),
    ("lai châu", agency_block!("lai_chau")),
    ("lâm đồng", agency_block!("lam_dong")),
    ("lạng sơn", agency_block!("lang_son")),
    ("lào cai", agency_block!("lao_cai")),
    ("nghệ an", agency_block!("nghe_an")),
    ("ninh bình", agency_block!("ninh_binh")),
    ("phú thọ", agency_block!("phu_tho")),
    ("quảng ngãi", agency_block!("quang_ngai")),
    ("quảng ninh", agency_block!("quang_ninh")),
    ("quảng trị", agency_block!("quang_tri")),
    ("sơn la", agency_block!("son_la")),
    ("tây ninh", agency_block!("tay_ninh")),
    ("thái nguyên", agency_block!("thai_nguyen")),
    ("thanh hóa", THANH_HOA),
    ("thanh hoá", THANH_HOA),
    ("tuyên quang", agency_block!("tuyen_quang")),
    ("vĩnh long", agency_block!("vinh_long")),
];

/// Blocks sent when no province key matches: the capital and the largest city.
const DEFAULT_BLOCKS: &[&str] = &[HA_NOI, HO_CHI_MINH];

static EMBEDDED: Lazy<AgencyReference> = Lazy::new(|| AgencyReference {
    blocks: PROVINCE_BLOCKS
        .iter()
        .map(|(key, rows)| (key.nfc().collect(), *rows))
        .collect(),
    defaults: DEFAULT_BLOCKS,
});

/// Which province block an excerpt was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcerptSource<'a> {
    Province(&'a str),
    Default,
}

/// Per-province agency reference blocks.
#[derive(Debug)]
pub struct AgencyReference {
    blocks: Vec<(String, &'static str)>,
    defaults: &'static [&'static str],
}

impl AgencyReference {
    pub fn embedded() -> &'static AgencyReference {
        &EMBEDDED
    }

    /// First province key contained in the address, if any.
    pub fn province_key(&self, address: &str) -> Option<&str> {
        self.find_block(address).map(|(key, _)| key.as_str())
    }

    /// Header plus the rows of the province named in `address`, or header
    /// plus the default provinces when none is recognised. Never empty.
    pub fn select_excerpt(&self, address: &str) -> String {
        self.select_with_source(address).0
    }

    pub fn select_with_source(&self, address: &str) -> (String, ExcerptSource<'_>) {
        if let Some((key, rows)) = self.find_block(address) {
            return (
                join_excerpt(std::iter::once(*rows)),
                ExcerptSource::Province(key),
            );
        }
        (
            join_excerpt(self.defaults.iter().copied()),
            ExcerptSource::Default,
        )
    }

    fn find_block(&self, address: &str) -> Option<&(String, &'static str)> {
        let haystack = fold_case(address);
        self.blocks
            .iter()
            .find(|(key, _)| haystack.contains(key.as_str()))
    }

    /// Number of province keys, aliases included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn fold_case(address: &str) -> String {
    address.nfc().collect::<String>().to_lowercase()
}

fn join_excerpt<'a>(blocks: impl Iterator<Item = &'a str>) -> String {
    let mut excerpt = String::from(AGENCY_HEADER);
    for block in blocks {
        excerpt.push('\n');
        excerpt.push_str(block.trim_end());
    }
    excerpt
}

/// [`AgencyReference::select_excerpt`] over the embedded reference.
pub fn select_reference_excerpt(address: &str) -> String {
    AgencyReference::embedded().select_excerpt(address)
}

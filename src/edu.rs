//! Static educational content per disease label.

/// One entry of the education table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EduEntry {
    pub key: &'static str,
    pub title: &'static str,
    pub desc: &'static str,
    pub actions: &'static [&'static str],
}

/// What the education panel shows for a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EduCard {
    pub title: String,
    pub desc: String,
    pub actions: Vec<String>,
}

pub const UNKNOWN_TITLE: &str = "Tidak diketahui";
pub const FALLBACK_DESC: &str = "Materi edukasi belum tersedia untuk label ini.";
pub const FALLBACK_ACTION: &str = "Belum ada saran penanganan untuk label ini.";

pub const EDU: &[EduEntry] = &[
    EduEntry {
        key: "algal",
        title: "Algal (Bercak Alga)",
        desc: "Bercak kehijauan/abu kusam seperti kerak tipis di permukaan daun. Muncul saat kelembapan tinggi.",
        actions: &[
            "Pangkas tajuk agar sirkulasi udara bagus.",
            "Kurangi kelembapan kebun (bersihkan gulma).",
            "Buang daun parah dan musnahkan.",
            "Jika perlu gunakan tembaga sesuai label setempat.",
        ],
    },
    EduEntry {
        key: "blight",
        title: "Blight (Hawar/Busuk Daun)",
        desc: "Daun mengering dari tepi, bercak melebar coklat/kehitaman. Cepat menyebar saat lembap.",
        actions: &[
            "Buang daun terinfeksi dan serasah basah.",
            "Hindari penyiraman dari atas (overhead).",
            "Perbaiki drainase dan kurangi kelembapan.",
            "Fungisida sesuai rekomendasi setempat bila parah.",
        ],
    },
    EduEntry {
        key: "Lcolletotrichum",
        title: "Colletotrichum (Antraknosa)",
        desc: "Bercak coklat gelap, kadang melingkar. Mudah menyebar saat musim hujan.",
        actions: &[
            "Pangkas bagian terinfeksi dan musnahkan.",
            "Gunakan mulsa untuk mengurangi percikan tanah.",
            "Pemangkasan rutin untuk sirkulasi udara.",
            "Fungisida sesuai label setempat bila perlu.",
        ],
    },
    EduEntry {
        key: "healthy",
        title: "Healthy (Daun Sehat)",
        desc: "Daun hijau merata, tidak ada gejala penyakit dominan.",
        actions: &[
            "Pertahankan sanitasi kebun dan pemangkasan ringan.",
            "Pemupukan seimbang untuk daya tahan tanaman.",
            "Monitoring rutin setelah hujan.",
            "Kontrol hama secara berkala.",
        ],
    },
    EduEntry {
        key: "phomopis",
        title: "Phomopsis",
        desc: "Bercak nekrotik tidak beraturan, kadang ada pinggiran kuning. Suka daun lembap lama.",
        actions: &[
            "Buang daun terinfeksi, jangan ditumpuk di kebun.",
            "Kurangi kelembapan tajuk (pemangkasan).",
            "Hindari luka pada daun saat pemeliharaan.",
            "Fungisida sesuai rekomendasi setempat bila meningkat.",
        ],
    },
    EduEntry {
        key: "rhizoctonia",
        title: "Rhizoctonia (Busuk Daun)",
        desc: "Bercak besar tidak teratur, daun tampak busuk/layu. Dipicu kelembapan tinggi dan sanitasi buruk.",
        actions: &[
            "Bersihkan serasah basah dan buang daun terinfeksi.",
            "Perbaiki drainase dan hindari genangan.",
            "Hindari nitrogen berlebihan.",
            "Fungisida sesuai rekomendasi setempat bila perlu.",
        ],
    },
];

/// Substring heuristics, tried in order after exact matches fail. Order matters where
/// substrings overlap.
const HEURISTICS: &[(&[&str], &str)] = &[
    (&["sehat"], "healthy"),
    (&["alga"], "algal"),
    (&["blight", "hawar"], "blight"),
    (&["collet"], "Lcolletotrichum"),
    (&["phom"], "phomopis"),
    (&["rhizo"], "rhizoctonia"),
];

fn entry(key: &str) -> Option<&'static EduEntry> {
    EDU.iter().find(|e| e.key == key)
}

/// Resolves a detection label to an education key.
pub fn normalize_label(label: &str) -> Option<&'static str> {
    let trimmed = label.trim();
    let low = trimmed.to_lowercase();

    if let Some(e) = entry(trimmed).or_else(|| entry(&low)) {
        return Some(e.key);
    }

    HEURISTICS
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| low.contains(*n)))
        .map(|(_, key)| *key)
}

/// Education card for `label`; unknown labels get the fallback card, never an error.
pub fn lookup(label: &str) -> EduCard {
    match normalize_label(label).and_then(entry) {
        Some(e) => EduCard {
            title: e.title.to_string(),
            desc: e.desc.to_string(),
            actions: e.actions.iter().map(|a| a.to_string()).collect(),
        },
        None => EduCard {
            title: if label.is_empty() {
                UNKNOWN_TITLE.to_string()
            } else {
                label.to_string()
            },
            desc: FALLBACK_DESC.to_string(),
            actions: vec![FALLBACK_ACTION.to_string()],
        },
    }
}

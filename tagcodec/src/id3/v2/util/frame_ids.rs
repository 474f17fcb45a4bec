//! Frame id translation between the ID3v2 revisions
//!
//! ID3v2.2 uses 3-character ids, ID3v2.3 and ID3v2.4 use 4-character ids. A handful of
//! ID3v2.3 frames were renamed in ID3v2.4.

use crate::id3::v2::header::Id3v2Version;

// (ID3v2.2, ID3v2.3) pairs, each id appears at most once per column
const V2_V3: &[(&str, &str)] = &[
	("BUF", "RBUF"),
	("CNT", "PCNT"),
	("COM", "COMM"),
	("CRA", "AENC"),
	("ETC", "ETCO"),
	("GEO", "GEOB"),
	("IPL", "IPLS"),
	("LNK", "LINK"),
	("MCI", "MCDI"),
	("MLL", "MLLT"),
	("PIC", "APIC"),
	("POP", "POPM"),
	("REV", "RVRB"),
	("RVA", "RVAD"),
	("SLT", "SYLT"),
	("STC", "SYTC"),
	("TAL", "TALB"),
	("TBP", "TBPM"),
	("TCM", "TCOM"),
	("TCO", "TCON"),
	("TCP", "TCMP"),
	("TCR", "TCOP"),
	("TDA", "TDAT"),
	("TDY", "TDLY"),
	("TEN", "TENC"),
	("TFT", "TFLT"),
	("TIM", "TIME"),
	("TKE", "TKEY"),
	("TLA", "TLAN"),
	("TLE", "TLEN"),
	("TMT", "TMED"),
	("TOA", "TOPE"),
	("TOF", "TOFN"),
	("TOL", "TOLY"),
	("TOR", "TORY"),
	("TOT", "TOAL"),
	("TP1", "TPE1"),
	("TP2", "TPE2"),
	("TP3", "TPE3"),
	("TP4", "TPE4"),
	("TPA", "TPOS"),
	("TPB", "TPUB"),
	("TRC", "TSRC"),
	("TRD", "TRDA"),
	("TRK", "TRCK"),
	("TS2", "TSO2"),
	("TSA", "TSOA"),
	("TSC", "TSOC"),
	("TSI", "TSIZ"),
	("TSP", "TSOP"),
	("TSS", "TSSE"),
	("TST", "TSOT"),
	("TT1", "TIT1"),
	("TT2", "TIT2"),
	("TT3", "TIT3"),
	("TXT", "TEXT"),
	("TXX", "TXXX"),
	("TYE", "TYER"),
	("UFI", "UFID"),
	("ULT", "USLT"),
	("WAF", "WOAF"),
	("WAR", "WOAR"),
	("WAS", "WOAS"),
	("WCM", "WCOM"),
	("WCP", "WCOP"),
	("WPB", "WPUB"),
	("WXX", "WXXX"),
];

// (ID3v2.3, ID3v2.4) pairs for the frames that were renamed
const V3_V4: &[(&str, &str)] = &[("IPLS", "TIPL"), ("TORY", "TDOR"), ("TYER", "TDRC")];

fn lookup(
	table: &'static [(&'static str, &'static str)],
	id: &str,
	forward: bool,
) -> Option<&'static str> {
	table.iter().find_map(|(from, to)| match forward {
		true if *from == id => Some(*to),
		false if *to == id => Some(*from),
		_ => None,
	})
}

/// Translate `id`, as found in a tag of version `from`, to its equivalent in version `to`
///
/// Returns `None` when the frame has no counterpart in the target version.
pub(crate) fn translate(id: &str, from: Id3v2Version, to: Id3v2Version) -> Option<String> {
	if from == to {
		return Some(id.to_owned());
	}

	let translated = match (from, to) {
		(Id3v2Version::V2, Id3v2Version::V3) => lookup(V2_V3, id, true)?,
		(Id3v2Version::V2, Id3v2Version::V4) => {
			let v3 = lookup(V2_V3, id, true)?;
			lookup(V3_V4, v3, true).unwrap_or(v3)
		},
		(Id3v2Version::V3, Id3v2Version::V2) => lookup(V2_V3, id, false)?,
		(Id3v2Version::V4, Id3v2Version::V2) => {
			let v3 = lookup(V3_V4, id, false).unwrap_or(id);
			lookup(V2_V3, v3, false)?
		},
		(Id3v2Version::V3, Id3v2Version::V4) => lookup(V3_V4, id, true).unwrap_or(id),
		(Id3v2Version::V4, Id3v2Version::V3) => lookup(V3_V4, id, false).unwrap_or(id),
		_ => id,
	};

	Some(translated.to_owned())
}

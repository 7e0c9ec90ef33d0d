//! Reassembly of chained eSIM STORE DATA requests
//!
//! Large RSP command objects do not fit a single short APDU, so the LPA
//! fragments them across several STORE DATA commands sharing CLA and INS.
//! `P1 = 0x11` marks an intermediate segment, `P1 = 0x91` the final one,
//! and `P2` counts up by one per segment. This module detects such runs in
//! a capture and rebuilds the logical TLV before decoding.
//!
//! The rebuilt message reuses the first segment's 5-byte header and tag
//! bytes; the BER length is always recomputed in canonical form over the
//! concatenated value, regardless of how the first segment encoded it.

use log::debug;

use super::{parse_header, ApduHeader};
use crate::hexutil;
use crate::model::RawMessage;
use crate::tlv::ber;

const P1_MORE: u8 = 0x11;
const P1_FINAL: u8 = 0x91;

fn is_chain_segment(hdr: &ApduHeader) -> bool {
    hdr.is_store_data() && matches!(hdr.p1, Some(P1_MORE) | Some(P1_FINAL))
}

/// Merge chained STORE DATA runs in a capture; all other messages pass
/// through untouched and in order.
///
/// A run ends at the first `P1 = 0x91` segment or at the first message
/// that breaks the CLA/INS/P1/P2 continuity rule. In the latter case the
/// breaking message is left in the output for independent reprocessing.
/// A run of one is returned unchanged, with no reassembly marker.
pub fn coalesce(messages: &[RawMessage]) -> Vec<RawMessage> {
    let mut out = Vec::with_capacity(messages.len());
    let mut i = 0;

    while i < messages.len() {
        let first = &messages[i];
        let hdr = parse_header(&first.raw);
        if !is_chain_segment(&hdr) || first.raw.len() <= 10 {
            out.push(first.clone());
            i += 1;
            continue;
        }

        let mut run: Vec<&RawMessage> = vec![first];
        let mut expected_p2 = hdr.p2;
        let mut finished = hdr.p1 == Some(P1_FINAL);
        let mut j = i + 1;

        while !finished && j < messages.len() {
            let next = &messages[j];
            let nh = parse_header(&next.raw);
            let next_p2 = expected_p2.map(|v| v.wrapping_add(1));
            let continues = next.direction == first.direction
                && nh.cla == hdr.cla
                && nh.ins == hdr.ins
                && matches!(nh.p1, Some(P1_MORE) | Some(P1_FINAL))
                && nh.p2 == next_p2
                && next.raw.len() > 10;
            if !continues {
                break;
            }
            run.push(next);
            expected_p2 = next_p2;
            finished = nh.p1 == Some(P1_FINAL);
            j += 1;
        }

        if run.len() == 1 {
            out.push(first.clone());
            i += 1;
            continue;
        }

        debug!("reassembling {} STORE DATA segments at index {}", run.len(), i);
        out.push(merge_run(&run));
        i = j;
    }

    out
}

/// Body of a segment with the 5-byte header stripped and a trailing `00`
/// Le artifact dropped.
fn stripped_payload(raw: &str) -> Vec<u8> {
    let mut body = hexutil::bytes_of(&raw[10..]);
    if body.last() == Some(&0x00) {
        body.pop();
    }
    body
}

fn merge_run(run: &[&RawMessage]) -> RawMessage {
    let first = run[0];
    let header = &first.raw[..10];

    let first_body = stripped_payload(&first.raw);

    // Tag bytes of the logical TLV, taken verbatim from the first segment.
    let tag_len = match first_body.first() {
        Some(b) if matches!(b, 0x9F | 0x5F | 0x7F | 0xBF) && first_body.len() > 1 => 2,
        Some(_) => 1,
        None => 0,
    };
    let tag_bytes = &first_body[..tag_len];

    // Skip the original length field, whatever its width was.
    let value_start = match first_body.get(tag_len) {
        Some(&l) if l < 0x80 => tag_len + 1,
        Some(&l) => tag_len + 1 + (l & 0x7F) as usize,
        None => tag_len,
    };

    let mut value: Vec<u8> = first_body
        .get(value_start..)
        .unwrap_or_default()
        .to_vec();
    for seg in &run[1..] {
        value.extend(stripped_payload(&seg.raw));
    }

    let mut rebuilt = String::with_capacity(10 + 2 * (tag_len + 5 + value.len()));
    rebuilt.push_str(header);
    rebuilt.push_str(&hexutil::to_hex(tag_bytes));
    rebuilt.push_str(&hexutil::to_hex(&ber::encode_length(value.len())));
    rebuilt.push_str(&hexutil::to_hex(&value));

    RawMessage {
        raw: rebuilt,
        direction: first.direction,
        meta: Some(format!("reassembled from {} segments", run.len())),
    }
}

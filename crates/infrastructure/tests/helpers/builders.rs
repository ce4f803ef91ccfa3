#![allow(dead_code)]
use iterdns_infrastructure::dns::wire::{decode_message, encode_name, Flags, MessageBuilder};
use std::net::Ipv4Addr;

/// Encodes a query with a fixed id.
pub fn query_for(name: &str, qtype: u16, id: u16) -> Vec<u8> {
    MessageBuilder::encode_query(name, qtype, 1, Flags::RECURSIVE_QUERY, Some(id))
        .unwrap()
        .1
}

/// Builds response messages byte by byte.
///
/// Record owner names are written uncompressed unless a `*_ptr` method is
/// used, which points back at the question name at offset 12.
pub struct ResponseBuilder {
    id: u16,
    flags: u16,
    question: Option<(String, u16)>,
    answers: Vec<Vec<u8>>,
    authorities: Vec<Vec<u8>>,
    additionals: Vec<Vec<u8>>,
}

impl ResponseBuilder {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            flags: 0x8000,
            question: None,
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    /// A response carrying the id and question of `query`.
    pub fn reply_to(query: &[u8]) -> Self {
        let msg = decode_message(query).unwrap();
        let mut builder = Self::new(msg.header.id);
        if let Some(q) = msg.questions.first() {
            builder.question = Some((q.name.clone(), q.qtype));
        }
        builder
    }

    pub fn question(mut self, name: &str, qtype: u16) -> Self {
        self.question = Some((name.to_string(), qtype));
        self
    }

    pub fn rcode(mut self, rcode: u8) -> Self {
        self.flags = (self.flags & !0x000F) | rcode as u16;
        self
    }

    pub fn authoritative(mut self) -> Self {
        self.flags |= 0x0400;
        self
    }

    pub fn answer_a(mut self, name: &str, ip: Ipv4Addr) -> Self {
        self.answers.push(record(name, 1, &ip.octets()));
        self
    }

    pub fn answer_a_ptr(mut self, ip: Ipv4Addr) -> Self {
        self.answers.push(record_ptr(1, &ip.octets()));
        self
    }

    pub fn answer_txt(mut self, name: &str, parts: &[&str]) -> Self {
        let mut rdata = Vec::new();
        for part in parts {
            rdata.push(part.len() as u8);
            rdata.extend_from_slice(part.as_bytes());
        }
        self.answers.push(record(name, 16, &rdata));
        self
    }

    pub fn answer_cname(mut self, name: &str, target: &str) -> Self {
        self.answers.push(record(name, 5, &name_bytes(target)));
        self
    }

    /// CNAME whose owner is the question name and whose target is
    /// `target_label` prepended to the question name, both compressed.
    pub fn answer_cname_ptr(mut self, target_label: &str) -> Self {
        let mut rdata = vec![target_label.len() as u8];
        rdata.extend_from_slice(target_label.as_bytes());
        rdata.extend_from_slice(&[0xC0, 0x0C]);
        self.answers.push(record_ptr(5, &rdata));
        self
    }

    pub fn answer_ns(mut self, name: &str, ns: &str) -> Self {
        self.answers.push(record(name, 2, &name_bytes(ns)));
        self
    }

    pub fn answer_mx(mut self, name: &str, preference: u16, exchange: &str) -> Self {
        let mut rdata = preference.to_be_bytes().to_vec();
        rdata.extend(name_bytes(exchange));
        self.answers.push(record(name, 15, &rdata));
        self
    }

    pub fn authority_ns(mut self, zone: &str, ns: &str) -> Self {
        self.authorities.push(record(zone, 2, &name_bytes(ns)));
        self
    }

    pub fn authority_cname(mut self, name: &str, target: &str) -> Self {
        self.authorities.push(record(name, 5, &name_bytes(target)));
        self
    }

    pub fn authority_soa(mut self, zone: &str) -> Self {
        let mut rdata = name_bytes("ns.invalid");
        rdata.extend(name_bytes("hostmaster.invalid"));
        rdata.extend_from_slice(&[0u8; 20]);
        self.authorities.push(record(zone, 6, &rdata));
        self
    }

    pub fn additional_a(mut self, name: &str, ip: Ipv4Addr) -> Self {
        self.additionals.push(record(name, 1, &ip.octets()));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(512);
        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&self.flags.to_be_bytes());
        out.extend_from_slice(&(self.question.is_some() as u16).to_be_bytes());
        out.extend_from_slice(&(self.answers.len() as u16).to_be_bytes());
        out.extend_from_slice(&(self.authorities.len() as u16).to_be_bytes());
        out.extend_from_slice(&(self.additionals.len() as u16).to_be_bytes());

        if let Some((name, qtype)) = &self.question {
            out.extend(name_bytes(name));
            out.extend_from_slice(&qtype.to_be_bytes());
            out.extend_from_slice(&1u16.to_be_bytes());
        }
        for rr in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            out.extend_from_slice(rr);
        }
        out
    }
}

fn name_bytes(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    encode_name(name, &mut out).unwrap();
    out
}

fn record(name: &str, rtype: u16, rdata: &[u8]) -> Vec<u8> {
    let mut out = name_bytes(name);
    push_fixed(&mut out, rtype, rdata);
    out
}

fn record_ptr(rtype: u16, rdata: &[u8]) -> Vec<u8> {
    let mut out = vec![0xC0, 0x0C];
    push_fixed(&mut out, rtype, rdata);
    out
}

fn push_fixed(out: &mut Vec<u8>, rtype: u16, rdata: &[u8]) {
    out.extend_from_slice(&rtype.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&300u32.to_be_bytes());
    out.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    out.extend_from_slice(rdata);
}

use super::QueryType;
use crate::buffer::reader::ReaderError;
use crate::buffer::writer::WriterError;
use crate::buffer::BytePacketBuffer;
use std::net::Ipv4Addr;

/// Resource record, interpreted for the two types the resolver acts on.
/// Everything else keeps its raw rdata and is never synthesized in replies.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Record {
    Unknown {
        domain: String,
        qtype: u16,
        ttl: u32,
        data: Vec<u8>,
    }, // 0
    A {
        domain: String,
        addr: Ipv4Addr,
        ttl: u32,
    }, // 1
    NS {
        domain: String,
        host: String,
        ttl: u32,
    }, // 2
}

impl Record {
    pub fn read(buffer: &mut BytePacketBuffer) -> Result<Record, ReaderError> {
        // NAME a domain name to which this resource record pertains.
        let domain = buffer.read_qname()?;

        // TYPE two octets containing one of the RR type codes.
        // This field specifies the meaning of the data in the RDATA field.
        let qtype_num = buffer.read_u16()?;
        let qtype = QueryType::from_num(qtype_num);

        // CLASS two octets which specify the class of the data in the RDATA field.
        let _qclass = buffer.read_u16()?;

        // TTL a 32 bit unsigned integer that specifies the time interval (in seconds)
        // that the resource record may be cached before it should be discarded.
        let ttl = buffer.read_u32()?;

        // RDLENGTH an unsigned 16 bit integer that specifies the length in octets of the RDATA field.
        let data_len = buffer.read_u16()?;

        let rdata_start = buffer.pos();

        let record = match qtype {
            QueryType::A if data_len == 4 => {
                let raw_addr = buffer.read_u32()?;
                let addr = Ipv4Addr::new(
                    ((raw_addr >> 24) & 0xFF) as u8,
                    ((raw_addr >> 16) & 0xFF) as u8,
                    ((raw_addr >> 8) & 0xFF) as u8,
                    (raw_addr & 0xFF) as u8,
                );

                Record::A { domain, addr, ttl }
            }
            QueryType::NS => {
                // The rdata is itself a name; pointers inside it may target
                // earlier parts of the whole message, so it is decoded in
                // place rather than from a copied-out slice.
                let host = buffer.read_qname()?;

                Record::NS { domain, host, ttl }
            }
            _ => {
                let data = buffer.get_range(rdata_start, data_len as usize)?.to_vec();

                Record::Unknown {
                    domain,
                    qtype: qtype_num,
                    ttl,
                    data,
                }
            }
        };

        // The cursor always lands exactly rdlength past the rdata start, so
        // that section counts and octets consumed stay in agreement.
        buffer.seek(rdata_start + data_len as usize)?;

        Ok(record)
    }

    pub fn write(&self, buffer: &mut BytePacketBuffer) -> Result<usize, WriterError> {
        let start_pos = buffer.pos();

        match *self {
            Record::A {
                ref domain,
                ref addr,
                ttl,
            } => {
                buffer.write_qname(domain)?;
                buffer.write_u16(QueryType::A.into_num())?;
                buffer.write_u16(1)?;
                buffer.write_u32(ttl)?;
                buffer.write_u16(4)?;

                let octets = addr.octets();
                buffer.write_u8(octets[0])?;
                buffer.write_u8(octets[1])?;
                buffer.write_u8(octets[2])?;
                buffer.write_u8(octets[3])?;
            }
            Record::NS {
                ref domain,
                ref host,
                ttl,
            } => {
                buffer.write_qname(domain)?;
                buffer.write_u16(QueryType::NS.into_num())?;
                buffer.write_u16(1)?;
                buffer.write_u32(ttl)?;

                // rdlength is only known once the host name is written
                let pos = buffer.pos();
                buffer.write_u16(0)?;

                buffer.write_qname(host)?;

                let size = buffer.pos() - (pos + 2);
                buffer.set_u16(pos, size as u16)?;
            }
            Record::Unknown { .. } => {
                // opaque rdata is carried through parsing only
            }
        }

        Ok(buffer.pos() - start_pos)
    }
}

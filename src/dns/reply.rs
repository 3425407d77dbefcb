use rootwalk_proto::buffer::{BytePacketBuffer, WriterError, HEADER_SIZE};
use rootwalk_proto::packet::QueryType;
use std::net::Ipv4Addr;

/// Flag word of a resolved reply: response, recursion desired echoed,
/// recursion available, rcode 0.
const ANSWER_FLAGS: u16 = 0x8180;

/// Flag word of a failed reply: same bits with rcode 3, name error.
const NXDOMAIN_FLAGS: u16 = 0x8183;

/// TTL stamped on synthesized answers.
const ANSWER_TTL: u32 = 60;

/// Reply for a resolved query. The client's transaction id is copied, the
/// octets following the request header are echoed verbatim, and a single A
/// record for the queried name is appended after them.
///
/// `request` must hold at least the fixed header; the caller has already
/// decoded a question out of it.
pub fn success(
    request: &[u8],
    qname: &str,
    addr: Ipv4Addr,
) -> Result<BytePacketBuffer, WriterError> {
    let mut reply = BytePacketBuffer::default();
    reply.write_range(&request[0..2])?;
    reply.write_u16(ANSWER_FLAGS)?;
    reply.write_u16(1)?; // QD
    reply.write_u16(1)?; // AN
    reply.write_u16(0)?; // NS
    reply.write_u16(0)?; // AR
    reply.write_range(&request[HEADER_SIZE..])?;

    reply.write_qname(qname)?;
    reply.write_u16(QueryType::A.into_num())?;
    reply.write_u16(1)?;
    reply.write_u32(ANSWER_TTL)?;
    reply.write_u16(4)?;
    reply.write_range(&addr.octets())?;

    Ok(reply)
}

/// NXDOMAIN-shaped reply: the flag word is replaced, everything after it is
/// echoed from the request, original section counts included. Consistent as
/// long as the client sent a single question and nothing else, which is the
/// only shape this frontend accepts.
pub fn failure(request: &[u8]) -> Result<BytePacketBuffer, WriterError> {
    let mut reply = BytePacketBuffer::default();
    reply.write_range(&request[0..2])?;
    reply.write_u16(NXDOMAIN_FLAGS)?;
    reply.write_range(&request[4..])?;

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use rootwalk_proto::buffer::BytePacketBuffer;
    use rootwalk_proto::packet::header::ResponseCode;
    use rootwalk_proto::packet::record::Record;
    use rootwalk_proto::packet::DnsPacket;
    use std::net::Ipv4Addr;

    fn request() -> Vec<u8> {
        let buffer = DnsPacket::query(0x1234, "example.com").create_buffer().unwrap();
        buffer.buf[..buffer.pos()].to_vec()
    }

    #[test]
    fn success_should_echo_id_and_question_and_append_answer() {
        let request = request();
        let reply = super::success(&request, "example.com", Ipv4Addr::new(93, 184, 216, 34))
            .unwrap();

        assert_eq!(reply.buf[0], 0x12);
        assert_eq!(reply.buf[1], 0x34);
        assert_eq!(reply.buf[2], 0x81);
        assert_eq!(reply.buf[3], 0x80);
        // the question octets are echoed verbatim
        assert_eq!(&reply.buf[12..request.len()], &request[12..]);

        let size = reply.pos();
        let parsed = DnsPacket::try_from(BytePacketBuffer::new(reply.buf)).unwrap();
        assert_eq!(parsed.header.id, 0x1234);
        assert!(parsed.header.response);
        assert!(parsed.header.recursion_available);
        assert_eq!(parsed.header.response_code, ResponseCode::NoError);
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.questions[0].name, "example.com");
        assert_eq!(
            parsed.answers,
            vec![Record::A {
                domain: "example.com".into(),
                addr: Ipv4Addr::new(93, 184, 216, 34),
                ttl: 60,
            }]
        );
        assert!(size > request.len());
    }

    #[test]
    fn failure_should_keep_request_counts() {
        let request = request();
        let reply = super::failure(&request).unwrap();

        assert_eq!(reply.pos(), request.len());
        assert_eq!(reply.buf[0], 0x12);
        assert_eq!(reply.buf[1], 0x34);
        assert_eq!(reply.buf[2], 0x81);
        assert_eq!(reply.buf[3], 0x83);
        // original counts and question survive untouched
        assert_eq!(&reply.buf[4..request.len()], &request[4..]);

        let parsed = DnsPacket::try_from(BytePacketBuffer::new(reply.buf)).unwrap();
        assert_eq!(parsed.header.response_code, ResponseCode::NameError);
        assert_eq!(parsed.header.questions, 1);
        assert_eq!(parsed.header.answers, 0);
    }
}

pub mod buffer;
pub mod packet;

#[cfg(test)]
mod tests {
    use crate::packet::record::Record;
    use crate::packet::{DnsPacket, QueryType};
    use std::net::Ipv4Addr;

    #[test]
    fn should_round_trip_query_packet() {
        let packet = DnsPacket::query(38005, "google.com");
        let buffer = packet.create_buffer().unwrap();
        // 12 header + 12 qname + 4 qtype/qclass
        assert_eq!(buffer.pos(), 28);

        let parsed = DnsPacket::try_from(buffer).unwrap();
        assert_eq!(parsed.header.id, 38005);
        assert!(parsed.header.recursion_desired);
        assert!(!parsed.header.response);

        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.questions[0].name, "google.com");
        assert_eq!(parsed.questions[0].qtype, QueryType::A);

        assert!(parsed.answers.is_empty());
        assert!(parsed.authorities.is_empty());
        assert!(parsed.resources.is_empty());
    }

    #[test]
    fn should_round_trip_answer_packet() {
        let packet = DnsPacket::query(4242, "example.com").with_answer(Record::A {
            domain: "example.com".into(),
            addr: Ipv4Addr::new(93, 184, 216, 34),
            ttl: 60,
        });
        let buffer = packet.create_buffer().unwrap();

        let parsed = DnsPacket::try_from(buffer).unwrap();
        assert_eq!(parsed.header.id, 4242);
        assert_eq!(parsed.answers.len(), 1);
        assert_eq!(
            parsed.answers[0],
            Record::A {
                domain: "example.com".into(),
                addr: Ipv4Addr::new(93, 184, 216, 34),
                ttl: 60,
            }
        );
    }

    #[test]
    fn should_round_trip_referral_packet() {
        let packet = DnsPacket::query(7, "example.com")
            .with_authority(Record::NS {
                domain: "com".into(),
                host: "a.gtld-servers.net".into(),
                ttl: 172800,
            })
            .with_resource(Record::A {
                domain: "a.gtld-servers.net".into(),
                addr: Ipv4Addr::new(192, 5, 6, 30),
                ttl: 172800,
            });
        let buffer = packet.create_buffer().unwrap();

        let parsed = DnsPacket::try_from(buffer).unwrap();
        assert!(parsed.answers.is_empty());
        assert_eq!(
            parsed.authorities,
            vec![Record::NS {
                domain: "com".into(),
                host: "a.gtld-servers.net".into(),
                ttl: 172800,
            }]
        );
        assert_eq!(
            parsed.resources,
            vec![Record::A {
                domain: "a.gtld-servers.net".into(),
                addr: Ipv4Addr::new(192, 5, 6, 30),
                ttl: 172800,
            }]
        );
    }

    #[test]
    fn should_decode_ns_rdata_pointing_at_question() {
        // Authority record whose NS host is a bare compression pointer to the
        // qname at offset 12, exercising whole-message pointer resolution.
        let packet = DnsPacket::query(1, "example.com");
        let mut buffer = packet.create_buffer().unwrap();
        buffer.write_qname("com").unwrap();
        buffer.write_u16(QueryType::NS.into_num()).unwrap();
        buffer.write_u16(1).unwrap();
        buffer.write_u32(3600).unwrap();
        buffer.write_u16(2).unwrap();
        buffer.write_u8(0xC0).unwrap();
        buffer.write_u8(12).unwrap();
        // patch the authority count in the raw header
        buffer.buf[8] = 0;
        buffer.buf[9] = 1;

        let parsed = DnsPacket::try_from(buffer).unwrap();
        assert_eq!(
            parsed.authorities,
            vec![Record::NS {
                domain: "com".into(),
                host: "example.com".into(),
                ttl: 3600,
            }]
        );
    }
}

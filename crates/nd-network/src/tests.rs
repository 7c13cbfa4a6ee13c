//! Unit tests for nd-network.

#[cfg(test)]
mod builder {
    use nd_core::LinkId;

    use crate::LinkNetworkBuilder;

    #[test]
    fn empty_build() {
        let net = LinkNetworkBuilder::new().build();
        assert_eq!(net.link_count(), 0);
        assert!(net.is_empty());
        assert!(!net.contains(LinkId(0)));
        assert_eq!(format!("{net:?}"), "LinkNetwork { link_freespeed_ms: [] }");
    }

    #[test]
    fn sequential_ids() {
        let mut b = LinkNetworkBuilder::with_capacity(3);
        assert_eq!(b.add_link(10.0), LinkId(0));
        assert_eq!(b.add_link(20.0), LinkId(1));
        assert_eq!(b.add_link(30.0), LinkId(2));
        let net = b.build();
        let ids: Vec<_> = net.links().collect();
        assert_eq!(ids, vec![LinkId(0), LinkId(1), LinkId(2)]);
        assert_eq!(net.link_freespeed_ms, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn freespeed_in_kmh() {
        let mut b = LinkNetworkBuilder::new();
        let l = b.add_link(10.0);
        let net = b.build();
        assert!((net.freespeed_kmh(l).unwrap() - 36.0).abs() < 1e-12);
        assert_eq!(net.freespeed_kmh(LinkId(5)), None);
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use nd_core::LinkId;

    use crate::{load_links_reader, NetworkError};

    #[test]
    fn loads_links_in_order() {
        let csv = "link_id,freespeed_ms\n0,13.89\n1,27.78\n";
        let net = load_links_reader(Cursor::new(csv)).unwrap();
        assert_eq!(net.link_count(), 2);
        assert!((net.freespeed_kmh(LinkId(1)).unwrap() - 100.008).abs() < 1e-9);
    }

    #[test]
    fn gap_in_ids_rejected() {
        let csv = "link_id,freespeed_ms\n0,13.89\n2,27.78\n";
        let err = load_links_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::LinkOutOfOrder { expected: LinkId(1), found: LinkId(2) }
        ));
    }

    #[test]
    fn non_positive_speed_rejected() {
        let csv = "link_id,freespeed_ms\n0,0\n";
        let err = load_links_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidSpeed { link: LinkId(0), .. }));
    }

    #[test]
    fn malformed_row_is_parse_error() {
        let csv = "link_id,freespeed_ms\nzero,13.89\n";
        let err = load_links_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, NetworkError::Parse(_)));
    }

    #[test]
    fn extra_columns_ignored() {
        let csv = "link_id,freespeed_ms,length_m\n0,13.89,500\n";
        let net = load_links_reader(Cursor::new(csv)).unwrap();
        assert_eq!(net, load_links_reader(Cursor::new("link_id,freespeed_ms\n0,13.89\n")).unwrap());
    }
}

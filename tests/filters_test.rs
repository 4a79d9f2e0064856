#[cfg(test)]
mod search_filter_validation {
    use seloger::features::listings::models::OpType;
    use seloger::features::search::schemas::{
        MarkerQuery, RadiusFilters, RadiusQuery, SearchFilters, Sort,
    };

    fn marker_query(bbox: &str) -> MarkerQuery {
        MarkerQuery {
            bbox: Some(bbox.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn validates_a_complete_set_of_filters() {
        let raw = MarkerQuery {
            bbox: Some("-16.0,18.0,-15.0,19.0".to_string()),
            q: Some("appartement".to_string()),
            min_price: Some("1000".to_string()),
            max_price: Some("5000".to_string()),
            min_rooms: Some("2".to_string()),
            max_rooms: Some("5".to_string()),
            min_surface: Some("50".to_string()),
            max_surface: Some("200".to_string()),
            op_type: Some("rent".to_string()),
            sort_by: Some("price_asc".to_string()),
            limit: Some("20".to_string()),
            offset: Some("0".to_string()),
        };

        let filters = SearchFilters::parse(&raw).unwrap();

        assert_eq!(filters.attributes.q.as_deref(), Some("appartement"));
        assert_eq!(filters.attributes.min_price, Some(1000.0));
        assert_eq!(filters.attributes.op_type, Some(OpType::Rent));
        assert_eq!(filters.sort_by, Sort::PriceAsc);
        assert_eq!(filters.limit, 20);
        assert_eq!(filters.bbox.min_lng, -16.0);
        assert_eq!(filters.bbox.max_lat, 19.0);
    }

    #[test]
    fn applies_defaults_for_limit_offset_and_sort() {
        let filters = SearchFilters::parse(&marker_query("-16.0,18.0,-15.0,19.0")).unwrap();

        assert_eq!(filters.limit, 50);
        assert_eq!(filters.offset, 0);
        assert_eq!(filters.sort_by, Sort::DateDesc);
    }

    #[test]
    fn fails_without_a_bbox() {
        let errors = SearchFilters::parse(&MarkerQuery::default()).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "bbox");
    }

    #[test]
    fn coerces_string_values_to_numbers() {
        let raw = MarkerQuery {
            min_price: Some("1000".to_string()),
            ..marker_query("-16.0,18.0,-15.0,19.0")
        };
        let filters = SearchFilters::parse(&raw).unwrap();

        assert_eq!(filters.attributes.min_price, Some(1000.0));
    }

    #[test]
    fn accepts_zero_values() {
        let raw = MarkerQuery {
            min_price: Some("0".to_string()),
            ..marker_query("0,0,0,0")
        };
        let filters = SearchFilters::parse(&raw).unwrap();

        assert_eq!(filters.attributes.min_price, Some(0.0));
    }

    #[test]
    fn rejects_non_numeric_bbox_components() {
        let errors = SearchFilters::parse(&marker_query("abc,18.0,-15.0,19.0")).unwrap_err();

        assert!(errors.iter().any(|e| e.field == "bbox"));
    }

    #[test]
    fn rejects_out_of_range_bbox_coordinates() {
        assert!(SearchFilters::parse(&marker_query("-181.0,18.0,-15.0,19.0")).is_err());
        assert!(SearchFilters::parse(&marker_query("-16.0,95.0,-15.0,19.0")).is_err());
    }

    #[test]
    fn accepts_all_six_sort_orders() {
        for sort in [
            "price_asc",
            "price_desc",
            "date_desc",
            "date_asc",
            "surface_desc",
            "surface_asc",
        ] {
            let raw = MarkerQuery {
                sort_by: Some(sort.to_string()),
                ..marker_query("0,0,1,1")
            };
            assert!(SearchFilters::parse(&raw).is_ok(), "sort {sort} rejected");
        }
    }

    #[test]
    fn rejects_an_unknown_sort_order() {
        let raw = MarkerQuery {
            sort_by: Some("invalid".to_string()),
            ..marker_query("0,0,1,1")
        };
        let errors = SearchFilters::parse(&raw).unwrap_err();

        assert!(errors.iter().any(|e| e.field == "sortBy"));
    }

    #[test]
    fn accepts_rent_and_sell_but_not_both() {
        for op in ["rent", "sell"] {
            let raw = MarkerQuery {
                op_type: Some(op.to_string()),
                ..marker_query("0,0,1,1")
            };
            assert!(SearchFilters::parse(&raw).is_ok());
        }

        let raw = MarkerQuery {
            op_type: Some("both".to_string()),
            ..marker_query("0,0,1,1")
        };
        let errors = SearchFilters::parse(&raw).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "opType"));
    }

    #[test]
    fn enforces_the_limit_bounds() {
        let raw = MarkerQuery {
            limit: Some("101".to_string()),
            ..marker_query("0,0,1,1")
        };
        assert!(SearchFilters::parse(&raw).is_err());

        let raw = MarkerQuery {
            limit: Some("100".to_string()),
            ..marker_query("0,0,1,1")
        };
        assert_eq!(SearchFilters::parse(&raw).unwrap().limit, 100);

        let raw = MarkerQuery {
            limit: Some("0".to_string()),
            ..marker_query("0,0,1,1")
        };
        assert!(SearchFilters::parse(&raw).is_err());
    }

    #[test]
    fn rejects_a_non_integer_limit() {
        let raw = MarkerQuery {
            limit: Some("10.5".to_string()),
            ..marker_query("0,0,1,1")
        };
        let errors = SearchFilters::parse(&raw).unwrap_err();

        assert!(errors.iter().any(|e| e.field == "limit"));
    }

    #[test]
    fn rejects_a_negative_offset() {
        let raw = MarkerQuery {
            offset: Some("-1".to_string()),
            ..marker_query("0,0,1,1")
        };
        let errors = SearchFilters::parse(&raw).unwrap_err();

        assert!(errors.iter().any(|e| e.field == "offset"));
    }

    #[test]
    fn reports_every_offending_field_at_once() {
        let raw = MarkerQuery {
            bbox: Some("abc,18.0,-15.0,19.0".to_string()),
            min_price: Some("cheap".to_string()),
            op_type: Some("both".to_string()),
            limit: Some("500".to_string()),
            ..Default::default()
        };

        let errors = SearchFilters::parse(&raw).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();

        assert!(fields.contains(&"bbox"));
        assert!(fields.contains(&"minPrice"));
        assert!(fields.contains(&"opType"));
        assert!(fields.contains(&"limit"));
    }

    #[test]
    fn radius_search_validates_center_and_radius() {
        let raw = RadiusQuery {
            lat: Some("18.0735".to_string()),
            lng: Some("-15.9582".to_string()),
            radius: Some("10".to_string()),
            q: Some("maison".to_string()),
            ..Default::default()
        };
        let filters = RadiusFilters::parse(&raw).unwrap();

        assert_eq!(filters.radius_km, 10.0);
        assert_eq!(filters.attributes.q.as_deref(), Some("maison"));
    }

    #[test]
    fn radius_defaults_to_five_km() {
        let raw = RadiusQuery {
            lat: Some("18.0".to_string()),
            lng: Some("-15.9".to_string()),
            ..Default::default()
        };
        assert_eq!(RadiusFilters::parse(&raw).unwrap().radius_km, 5.0);
    }

    #[test]
    fn radius_rejects_invalid_geometry() {
        let raw = RadiusQuery {
            lat: Some("95".to_string()),
            lng: Some("-15.9582".to_string()),
            radius: Some("10".to_string()),
            ..Default::default()
        };
        assert!(RadiusFilters::parse(&raw).is_err());

        let raw = RadiusQuery {
            lat: Some("18".to_string()),
            lng: Some("-15".to_string()),
            radius: Some("-1".to_string()),
            ..Default::default()
        };
        assert!(RadiusFilters::parse(&raw).is_err());

        let raw = RadiusQuery {
            lat: Some("18".to_string()),
            lng: Some("181".to_string()),
            radius: Some("1".to_string()),
            ..Default::default()
        };
        assert!(RadiusFilters::parse(&raw).is_err());

        let raw = RadiusQuery {
            lat: Some("18".to_string()),
            radius: Some("1".to_string()),
            ..Default::default()
        };
        let errors = RadiusFilters::parse(&raw).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "lng"));
    }

    #[test]
    fn radius_rejects_more_than_fifty_km() {
        let raw = RadiusQuery {
            lat: Some("18".to_string()),
            lng: Some("-15".to_string()),
            radius: Some("51".to_string()),
            ..Default::default()
        };
        let errors = RadiusFilters::parse(&raw).unwrap_err();

        assert!(errors.iter().any(|e| e.field == "radius"));
    }
}

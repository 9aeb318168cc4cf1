mod common;

use retail_normalize::{
    DatasetInput, NormalizedRecord, convert::convert_value, normalize_data,
    normalize_multiple_datasets, record::ORIGINAL_KEY, schema::ColumnType,
};
use serde_json::{Value, json};

use common::records;

fn originals(rows: &[NormalizedRecord]) -> Vec<Value> {
    rows.iter().map(|row| row[ORIGINAL_KEY].clone()).collect()
}

#[test]
fn korean_receipt_rows_normalize_to_sales() {
    let input = records(json!([{"상품명": "우유", "가격": "2500", "수량": "3"}]));
    let result = normalize_data(&input, "매출");

    assert_eq!(result.schema_type, "sales");
    assert_eq!(result.original_columns, vec!["상품명", "가격", "수량"]);
    let row = &result.mapped_data[0];
    assert_eq!(row["product_name"], json!("우유"));
    assert_eq!(row["price"], json!(2500));
    assert_eq!(row["quantity"], json!(3));
    assert_eq!(row["total_amount"], json!(7500));
    assert!(row["transaction_id"].as_str().unwrap().starts_with("TXN_"));
    assert_eq!(
        result.metadata.column_mappings.get("price").map(String::as_str),
        Some("가격")
    );
}

#[test]
fn oversized_sales_total_is_still_derived() {
    let input = records(json!([{"상품명": "x", "가격": "10000000000", "수량": "10000000000"}]));
    let result = normalize_data(&input, "매출");
    let row = &result.mapped_data[0];
    assert_eq!(row["price"], json!(10_000_000_000i64));
    assert_eq!(row["quantity"], json!(10_000_000_000i64));
    assert_eq!(row["total_amount"], json!(1.0e20));
}

#[test]
fn flattened_array_columns_are_folded_back() {
    let input = records(json!([{"zones[0]": "A", "zones[1]": "B", "name": "path1"}]));
    let result = normalize_data(&input, "xyz_foo");
    assert_eq!(
        Value::Object(result.mapped_data[0].clone()),
        json!({"zones": ["A", "B"], "name": "path1"})
    );
}

#[test]
fn spreadsheet_serial_decodes_to_a_2025_date() {
    let converted = convert_value(&json!(45819), ColumnType::Date);
    assert!(converted.as_str().unwrap().starts_with("2025-"));
}

#[test]
fn empty_input_is_a_well_formed_result() {
    let result = normalize_data(&[], "아무거나");
    assert!(result.mapped_data.is_empty());
    assert_eq!(result.metadata.quality_score, 0.0);
    assert_eq!(result.metadata.total_records, 0);
    assert_eq!(result.schema_type, "아무거나");
}

#[test]
fn unknown_labels_pass_data_through() {
    let input = records(json!([{"foo": "1", "bar": [1, 2]}, {"foo": "2"}]));
    let result = normalize_data(&input, "xyz_foo");
    assert_eq!(result.schema_type, "other");
    assert_eq!(result.metadata.quality_score, 0.5);
    assert_eq!(result.mapped_data, input);
    assert!(result.mapped_data.iter().all(|row| !row.contains_key(ORIGINAL_KEY)));
}

#[test]
fn full_korean_sales_export() {
    let input = records(json!([
        {
            "거래번호": "T-001", "거래일시": "2025-06-11 09:30:00", "상품명": "우유",
            "카테고리": "유제품", "판매단가": "2,500", "판매수량": "2", "결제금액": "",
            "할인금액": "0", "결제수단": "카드", "고객번호": "C-7", "매장코드": "S01"
        },
        {
            "거래번호": "", "거래일시": 45819, "상품명": "빵",
            "카테고리": "베이커리", "판매단가": "n/a", "판매수량": "1", "결제금액": "12,000",
            "할인금액": "", "결제수단": "현금", "고객번호": 1042, "매장코드": "S01"
        }
    ]));
    let result = normalize_data(&input, "6월 판매 내역");
    assert_eq!(result.schema_type, "sales");
    assert_eq!(result.metadata.column_mappings.len(), 11);
    assert_eq!(result.metadata.quality_score, 1.0);

    let first = &result.mapped_data[0];
    assert_eq!(first["transaction_id"], json!("T-001"));
    assert_eq!(first["timestamp"], json!("2025-06-11T09:30:00.000Z"));
    assert_eq!(first["price"], json!(2500));
    assert_eq!(first["total_amount"], json!(5000));
    assert_eq!(first["discount"], json!(0));
    assert_eq!(first["payment_method"], json!("카드"));

    let second = &result.mapped_data[1];
    let generated = second["transaction_id"].as_str().unwrap();
    assert!(generated.starts_with("TXN_") && generated.ends_with("_1"));
    assert_eq!(second["timestamp"], json!("2025-06-11T00:00:00.000Z"));
    assert_eq!(second["price"], Value::Null);
    assert_eq!(second["total_amount"], json!(12000));
    assert_eq!(second["discount"], Value::Null);
    assert_eq!(second["customer_id"], json!("1042"));
}

#[test]
fn traffic_paths_are_merged_then_typed() {
    let input = records(json!([
        {"측정일시": "2025-06-11T10:00:00+09:00", "구역코드": "Z-01", "방문자수": "37",
         "체류시간": "12.5", "path[0]": "입구", "path[1]": "계산대"},
        {"측정일시": "2025-06-11T11:00:00+09:00", "구역코드": "Z-02", "방문자수": "n/a",
         "체류시간": "", "path[0]": "입구"}
    ]));
    let result = normalize_data(&input, "매장 동선 센서");
    assert_eq!(result.schema_type, "traffic");
    assert_eq!(result.metadata.quality_score, 1.0);

    let first = &result.mapped_data[0];
    assert_eq!(first["timestamp"], json!("2025-06-11T01:00:00.000Z"));
    assert_eq!(first["visitor_count"], json!(37));
    assert_eq!(first["dwell_time"], json!(12.5));
    assert_eq!(first["path"], json!(["입구", "계산대"]));
    assert_eq!(first[ORIGINAL_KEY]["path"], json!(["입구", "계산대"]));

    let second = &result.mapped_data[1];
    assert_eq!(second["visitor_count"], Value::Null);
    assert_eq!(second["dwell_time"], Value::Null);
    assert_eq!(second["path"], json!(["입구"]));
}

#[test]
fn customer_flags_and_preferences_are_typed() {
    let input = records(json!([{
        "customer_id": 1042,
        "customer_name": "김하나",
        "is_member": "Y",
        "preferences": "{\"channel\": \"app\"}",
        "join_date": "2023년 3월 5일",
        "age": " 34 "
    }]));
    let result = normalize_data(&input, "고객 명단");
    let row = &result.mapped_data[0];
    assert_eq!(result.schema_type, "customer");
    assert_eq!(row["customer_id"], json!("1042"));
    assert_eq!(row["is_member"], json!(true));
    assert_eq!(row["preferences"], json!({"channel": "app"}));
    assert_eq!(row["join_date"], json!("2023-03-05T00:00:00.000Z"));
    assert_eq!(row["age"], json!(34));
}

#[test]
fn renormalizing_originals_is_idempotent() {
    let input = records(json!([
        {"거래번호": "T-1", "상품명": "우유", "가격": "2500", "수량": "3", "tags[0]": "x"},
        {"거래번호": "T-2", "상품명": "빵", "가격": "bad", "수량": "1", "tags[0]": "y"}
    ]));
    let first = normalize_data(&input, "매출");
    let again = normalize_data(&records(Value::Array(originals(&first.mapped_data))), "매출");
    assert_eq!(again.mapped_data, first.mapped_data);
    assert_eq!(again.metadata.column_mappings, first.metadata.column_mappings);
}

#[test]
fn invariants_hold_for_sparse_records() {
    let input = records(json!([
        {"product_id": "P1", "stock_quantity": "5"},
        {"warehouse": "W1"},
        {}
    ]));
    let result = normalize_data(&input, "재고");
    assert_eq!(result.mapped_data.len(), input.len());
    assert_eq!(result.metadata.total_records, input.len());
    for raw in result.metadata.column_mappings.values() {
        assert!(result.original_columns.contains(raw));
    }
    for (row, original) in result.mapped_data.iter().zip(&input) {
        assert_eq!(row[ORIGINAL_KEY], Value::Object(original.clone()));
    }
    assert_eq!(result.mapped_data[2]["product_id"], Value::Null);
}

#[test]
fn multiple_datasets_are_independent() {
    let datasets = vec![
        DatasetInput::new(records(json!([{"상품명": "우유", "가격": "2500", "수량": "3"}])), "매출"),
        DatasetInput::new(records(json!([{"foo": 1}])), "misc"),
        DatasetInput::new(Vec::new(), "zone"),
    ];
    let results = normalize_multiple_datasets(&datasets);
    assert_eq!(results.len(), 3);
    assert_eq!(
        results.keys().collect::<Vec<_>>(),
        vec!["dataset_0_매출", "dataset_1_misc", "dataset_2_zone"]
    );
    assert_eq!(results["dataset_0_매출"].schema_type, "sales");
    assert_eq!(results["dataset_1_misc"].schema_type, "other");
    assert_eq!(results["dataset_2_zone"].schema_type, "zone");
    assert_eq!(results["dataset_2_zone"].metadata.quality_score, 0.0);
}

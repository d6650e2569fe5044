use pretty_assertions::assert_eq;
use wb_sql_format::{FormatError, FormatOptions, format_sql, format_statement, try_format_sql};

fn fmt(sql: &str) -> String {
    format_sql(sql, &FormatOptions::default())
}

fn column_of(line: &str, needle: &str) -> usize {
    line.find(needle).expect("needle should be on the line")
}

#[test]
fn test_collapse_threshold() {
    let sql = "SELECT * FROM t WHERE x IN (SELECT id FROM u)";
    assert_eq!(
        format_statement(sql, 20, &[]).unwrap(),
        "SELECT *\nFROM t\nWHERE x IN (SELECT id FROM u)"
    );
    assert_eq!(
        format_statement(sql, 5, &[]).unwrap(),
        "SELECT *\nFROM t\nWHERE x IN (SELECT id\n            FROM u)"
    );
}

#[test]
fn test_column_alignment() {
    let result = fmt("CREATE TABLE t (id INTEGER, longname VARCHAR(100))");
    let lines: Vec<&str> = result.lines().collect();
    assert_eq!(lines.len(), 5);
    let id_type = column_of(lines[2], "INTEGER");
    let longname_type = column_of(lines[3], "VARCHAR");
    assert_eq!(id_type, longname_type);
    assert_eq!(id_type - column_of(lines[3], "longname"), "longname".len() + 2);
}

#[test]
fn test_and_or_line_breaks() {
    let result = fmt("SELECT * FROM t WHERE a=1 AND b=2 OR c=3");
    assert_eq!(result, "SELECT *\nFROM t\nWHERE a = 1\nAND b = 2\n OR c = 3");
    let where_body = &result[result.find("WHERE").unwrap()..];
    assert_eq!(where_body.matches('\n').count(), 2);
}

#[test]
fn test_list_wrap_threshold() {
    let ten = fmt("SELECT * FROM t WHERE x IN (1,2,3,4,5,6,7,8,9,10)");
    assert_eq!(
        ten,
        "SELECT *\nFROM t\nWHERE x IN (1, 2, 3, 4, 5, 6, 7, 8, 9, 10)"
    );

    let eleven = fmt("SELECT * FROM t WHERE x IN (1,2,3,4,5,6,7,8,9,10,11)");
    let in_list: Vec<&str> = eleven.lines().skip(2).collect();
    assert_eq!(in_list.len(), 11);
    assert!(in_list[1..].iter().all(|line| line.starts_with("            ")));
}

#[test]
fn test_unbalanced_input_fallback() {
    let sql = "SELECT * FROM t WHERE (a=1";
    assert_eq!(fmt(sql), sql);

    let failure = try_format_sql(sql, &FormatOptions::default()).unwrap_err();
    assert_eq!(failure.error, FormatError::UnbalancedBracket { depth: 1 });
    assert_eq!(failure.into_original(), sql);
}

#[test]
fn test_stray_closing_bracket_fallback() {
    let sql = "select a) from t";
    assert_eq!(fmt(sql), sql);
}

#[test]
fn test_full_query() {
    let sql = "select p.name, count(*) as moons from planets p left join moons m on m.planet_id = p.id \
               where p.mass > 10 and p.kind in ('gas', 'ice') group by p.name having count(*) > 2 \
               order by moons desc;";
    assert_eq!(
        fmt(sql),
        "SELECT p.name,\n       count(*) AS moons\nFROM planets p LEFT JOIN\n     moons m ON m.planet_id = p.id\n\
         WHERE p.mass > 10\nAND p.kind IN ('gas', 'ice')\nGROUP BY p.name\nHAVING count(*) > 2\n\
         ORDER BY moons DESC;\n\n"
    );
}

#[test]
fn test_insert_values() {
    assert_eq!(
        fmt("insert into comets (name, period) values ('halley', 76)"),
        "INSERT INTO comets\n(\n  name,\n  period\n)\nVALUES\n(\n  'halley',\n  76\n)"
    );
}

#[test]
fn test_update_with_subselect() {
    assert_eq!(
        fmt("update stars set brightness = (select max(b) from readings r where r.star_id = stars.id)"),
        "UPDATE stars\nSET brightness = (SELECT max(b) FROM readings r WHERE r.star_id = stars.id)"
    );
}

#[test]
fn test_delete_statement() {
    assert_eq!(
        fmt("delete from asteroids where diameter < 1 or diameter is null"),
        "DELETE\nFROM asteroids\nWHERE diameter < 1\n OR diameter IS NULL"
    );
}

#[test]
fn test_lowercase_keywords() {
    let options = FormatOptions {
        uppercase: false,
        ..FormatOptions::default()
    };
    assert_eq!(
        format_sql("SELECT a FROM t ORDER BY a", &options),
        "select a\nfrom t\norder by a"
    );
}

#[test]
fn test_wb_command() {
    assert_eq!(
        fmt("WbExport -type=text -file='/tmp/Stars.txt' -table=stars;"),
        "WBexport\n  -type=text\n  -file='/tmp/Stars.txt'\n  -table=stars;\n\n"
    );
}

#[test]
fn test_backslash_escaped_literal_is_kept_intact() {
    assert_eq!(fmt("select e'it\\'s' from t"), "SELECT e'it\\'s'\nFROM t");
}

#[test]
fn test_unclosed_literal_returns_input_unchanged() {
    let sql = "select 'it\\'s' from t where a = 1";
    assert_eq!(fmt(sql), sql);
    let failure = try_format_sql(sql, &FormatOptions::default()).unwrap_err();
    assert_eq!(
        failure.error,
        FormatError::UnterminatedConstruct { construct: "string literal" }
    );
}

#[test]
fn test_dollar_parameters_and_bodies() {
    assert_eq!(
        fmt("select * from t where id = $1 and body = $$a  b$$"),
        "SELECT *\nFROM t\nWHERE id = $1\nAND body = $$a  b$$"
    );
}

mod common;
use common::*;

#[test]
fn test_for_leaves_counter_past_end() {
    let mut r = runtime();
    assert_eq!(exec(&mut r, "FOR i=1 TO 3:NEXT i:PRINT i"), "4\n");
}

#[test]
fn test_for_descending_step() {
    let mut r = runtime();
    exec_all(
        &mut r,
        &["10 FOR i=5 TO 1 STEP -1", "20 PRINT i;", "30 NEXT i"],
    );
    assert_eq!(exec(&mut r, "RUN"), "54321");
}

#[test]
fn test_for_runs_body_once() {
    let mut r = runtime();
    assert_eq!(exec(&mut r, "FOR i=3 TO 0:PRINT i;:NEXT i"), "3");
}

#[test]
fn test_nested_for_in_direct_mode() {
    let mut r = runtime();
    assert_eq!(
        exec(&mut r, "FOR i=1 TO 2:FOR j=1 TO 2:PRINT i*10+j;\" \";:NEXT j:NEXT i"),
        "11 12 21 22 "
    );
}

#[test]
fn test_next_errors() {
    let mut r = runtime();
    assert_eq!(exec(&mut r, "NEXT q"), "?VARIABLE NOT FOUND\n");
    assert_eq!(exec(&mut r, "q=1:NEXT q"), "?NEXT WITHOUT FOR\n");
    assert_eq!(exec(&mut r, "FOR a$=1 TO 2"), "?ERROR IN EXPR\n");
}

#[test]
fn test_direct_line_number_deletes() {
    let mut r = runtime();
    exec_all(&mut r, &["10 PRINT 1", "20 PRINT 2", "10"]);
    assert_eq!(exec(&mut r, "LIST"), "20 PRINT 2\n");
}

#[test]
fn test_replace_line() {
    let mut r = runtime();
    exec_all(&mut r, &["20 PRINT 2", "10 PRINT 1", "20 PRINT 3"]);
    assert_eq!(exec(&mut r, "LIST"), "10 PRINT 1\n20 PRINT 3\n");
    assert_eq!(exec(&mut r, "RUN"), "1\n3\n");
}

#[test]
fn test_syntax_error_has_no_side_effects() {
    let mut r = runtime();
    assert_eq!(exec(&mut r, "a=1:PRINT \"X\":PRINT (2"), "?MISSING BRACKET\n");
    assert_eq!(exec(&mut r, "PRINT a"), "?VARIABLE NOT FOUND\n");
    assert_eq!(exec(&mut r, "10 PRINT (2"), "?MISSING BRACKET\n");
    assert_eq!(exec(&mut r, "LIST"), "");
}

#[test]
fn test_statement_separators() {
    let mut r = runtime();
    assert_eq!(exec(&mut r, "PRINT 1:"), "?BAD COMMAND\n");
    assert_eq!(exec(&mut r, "a=1 b=2"), "?BAD COMMAND\n");
    assert_eq!(exec(&mut r, "THEN"), "?BAD COMMAND\n");
    assert_eq!(exec(&mut r, "PRINT 1:PRINT 2"), "1\n2\n");
}

#[test]
fn test_if_then() {
    let mut r = runtime();
    assert_eq!(exec(&mut r, "a=1:IF a=1 THEN PRINT \"Y\""), "Y\n");
    assert_eq!(exec(&mut r, "IF 0 THEN PRINT \"N\":PRINT \"M\""), "");
    assert_eq!(exec(&mut r, "IF 1 PRINT"), "?MISSING THEN IN IF\n");
    assert_eq!(exec(&mut r, "IF \"x\" THEN PRINT"), "?NUMERIC EXPR EXPECTED\n");
}

#[test]
fn test_goto_and_gosub() {
    let mut r = runtime();
    exec_all(
        &mut r,
        &[
            "10 GOSUB 30",
            "20 PRINT \"B\":GOTO 40",
            "30 PRINT \"A\";:RETURN",
            "40 REM done",
        ],
    );
    assert_eq!(exec(&mut r, "RUN"), "AB\n");
}

#[test]
fn test_gosub_from_direct_mode_returns_to_it() {
    let mut r = runtime();
    exec(&mut r, "100 PRINT \"SUB\";:RETURN");
    assert_eq!(exec(&mut r, "GOSUB 100:PRINT \"BACK\""), "SUBBACK\n");
}

#[test]
fn test_bad_jumps() {
    let mut r = runtime();
    exec(&mut r, "10 REM");
    assert_eq!(exec(&mut r, "GOSUB 100"), "?BAD LINE NUMBER\n");
    assert_eq!(exec(&mut r, "GOTO 0"), "?BAD LINE NUMBER\n");
    assert_eq!(exec(&mut r, "RETURN"), "?RETURN WITHOUT GOSUB\n");
    assert_eq!(exec(&mut r, "RUN 0"), "?BAD LINE NUMBER\n");
}

#[test]
fn test_run_from_line() {
    let mut r = runtime();
    exec_all(&mut r, &["10 PRINT 1", "20 PRINT 2"]);
    assert_eq!(exec(&mut r, "RUN 15"), "2\n");
}

#[test]
fn test_run_clears_variables() {
    let mut r = runtime();
    exec_all(&mut r, &["a=3", "10 PRINT a"]);
    assert_eq!(exec(&mut r, "RUN"), "?VARIABLE NOT FOUND IN 10\n");
}

#[test]
fn test_stop_and_cont() {
    let mut r = runtime();
    exec_all(&mut r, &["10 PRINT \"A\";", "20 STOP:PRINT \"B\";", "30 PRINT \"C\""]);
    assert_eq!(exec(&mut r, "RUN"), "A?STOP STATEMENT IN 20\n");
    assert_eq!(exec(&mut r, "CONT"), "BC\n");
    assert_eq!(exec(&mut r, "CONT"), "");
}

#[test]
fn test_cont_after_deleting_line() {
    let mut r = runtime();
    exec_all(&mut r, &["10 STOP:PRINT \"X\"", "20 PRINT \"C\""]);
    exec(&mut r, "RUN");
    exec(&mut r, "10");
    assert_eq!(exec(&mut r, "CONT"), "C\n");
}

#[test]
fn test_return_to_deleted_line() {
    let mut r = runtime();
    exec_all(
        &mut r,
        &[
            "10 GOSUB 100:PRINT \"X\"",
            "20 PRINT \"C\":GOTO 200",
            "100 STOP:RETURN",
            "200 REM",
        ],
    );
    assert_eq!(exec(&mut r, "RUN"), "?STOP STATEMENT IN 100\n");
    exec(&mut r, "10");
    assert_eq!(exec(&mut r, "CONT"), "C\n");
}

#[test]
fn test_next_to_deleted_line() {
    let mut r = runtime();
    exec_all(
        &mut r,
        &[
            "10 FOR i=1 TO 2:PRINT \"F\";",
            "15 PRINT i;",
            "20 IF i=1 THEN STOP",
            "30 NEXT i",
            "40 PRINT \"E\"",
        ],
    );
    assert_eq!(exec(&mut r, "RUN"), "F1?STOP STATEMENT IN 20\n");
    exec(&mut r, "10");
    assert_eq!(exec(&mut r, "CONT"), "2E\n");
}

#[test]
fn test_break() {
    let mut r = runtime();
    exec(&mut r, "10 GOTO 10");
    r.host_mut().break_after = Some(100);
    assert_eq!(exec(&mut r, "RUN"), "?BREAK PRESSED IN 10\n");
}

#[test]
fn test_new() {
    let mut r = runtime();
    exec_all(&mut r, &["10 PRINT 1", "a=2"]);
    assert_eq!(exec(&mut r, "NEW:PRINT 5"), "");
    assert_eq!(exec(&mut r, "LIST"), "");
    assert_eq!(exec(&mut r, "PRINT a"), "?VARIABLE NOT FOUND\n");
}

#[test]
fn test_rem() {
    let mut r = runtime();
    assert_eq!(exec(&mut r, "PRINT 1:REM PRINT 2"), "1\n");
    exec(&mut r, "10 REM   keep \"this\"");
    assert_eq!(exec(&mut r, "LIST"), "10 REM keep \"this\"\n");
}

#[test]
fn test_list_range() {
    let mut r = runtime();
    exec_all(&mut r, &["10 a=1", "20 b=2", "30 c=3"]);
    assert_eq!(exec(&mut r, "LIST 20,20"), "20 b=2\n");
    assert_eq!(exec(&mut r, "LIST 25"), "30 c=3\n");
}

#[test]
fn test_device_statements() {
    let mut r = runtime();
    assert_eq!(exec(&mut r, "PAUSE -1"), "?BAD PARAMETER\n");
    exec(&mut r, "PAUSE 20:POSITION 3,4:PINMODE 2,1:PIN 2,1");
    assert_eq!(r.host().slept, 20);
    assert_eq!(r.host().cursor, Some((3, 4)));
    assert_eq!(r.host().pin_modes, vec![(2, 1)]);
    assert_eq!(exec(&mut r, "PRINT PINREAD(2);ANALOGRD(2)"), "1100\n");
    assert_eq!(exec(&mut r, "CLS"), "<CLS>");
}

#[test]
fn test_position_passes_coordinates() {
    let mut r = runtime();
    exec(&mut r, "x=7:POSITION x*2,0");
    assert_eq!(r.host().cursor, Some((14, 0)));
    exec(&mut r, "POSITION 0,23");
    assert_eq!(r.host().cursor, Some((0, 23)));
    assert_eq!(exec(&mut r, "POSITION 1"), "?ERROR IN EXPR\n");
    assert_eq!(exec(&mut r, "POSITION \"A\",1"), "?NUMERIC EXPR EXPECTED\n");
}

/*!
# Introductory Tutorial for Arena BASIC

Run the `basic` executable from a terminal. The banner shows how much of
the arena is free, then the interpreter waits for input.
Type CTRL-D to exit.
<pre><code>&nbsp;  8192 BYTES FREE
&nbsp;  READY.
&nbsp;> █
</code></pre>

 Stop a running program with CTRL-C.

A line without a number runs immediately. This is direct mode.

<pre><code>&nbsp;> print "Hello World"
&nbsp;  Hello World
&nbsp;  READY.
</code></pre>

Put a line number from 1 to 65535 in front of a statement to store it
instead. Typing a line number alone deletes that line.

<pre><code>&nbsp;> 10 print "Hello World"
&nbsp;> LIST
&nbsp;  10 PRINT "Hello World"
&nbsp;> RUN
&nbsp;  Hello World
</code></pre>

Lines are checked before they are stored or run, so a syntax error is
reported before anything happens.

<pre><code>&nbsp;> 20 print (1+
&nbsp;  ?ERROR IN EXPR
</code></pre>

## Variables

Names keep eight significant characters and ignore case. A name ending
in `$` holds a string. Numbers are single precision floats.

<pre><code>&nbsp;> a$="HELLO":n=LEN(a$):PRINT LEFT$(a$,n-1);n
&nbsp;  HELL5
</code></pre>

Arrays are created with `DIM` and indexed from 1.

<pre><code>&nbsp;> DIM b(3,3):b(2,3)=7:PRINT b(2,3)
&nbsp;  7
</code></pre>

## Flow

`GOTO`, `GOSUB`/`RETURN`, `FOR`/`NEXT` with an optional `STEP` and
`IF .. THEN` all work as you would expect. `STOP` pauses a program and
`CONT` picks up after it.

<pre><code>&nbsp;> 10 FOR i=5 TO 1 STEP -1:PRINT i;:NEXT i
&nbsp;> 20 PRINT
&nbsp;> RUN
&nbsp;  54321
</code></pre>

## Storage

`SAVE` and `LOAD` use the default slot. `SAVE+` also marks the program
to run when the interpreter starts. `SAVE "name"`, `LOAD "name"` and
`DELETE "name"` work with named programs and `DIR` lists them.

*/

/*!
# Introductory Tutorial for TempleCode

Run the executable with no arguments to get the interactive prompt. Every
line you type runs immediately against the same variables and turtle.
Type CTRL-D to exit.
<pre><code>&nbsp;  TempleCode
&nbsp;  READY.
&nbsp;> █
</code></pre>

Stop a running program with CTRL-C.

A program is a text file. Each line is one of three kinds of command and
the first word decides which. You can mix all three in one file and they
share their variables.

## BASIC

Lines may carry a line number, which is only needed for `GOTO` and
`GOSUB`. `LET` is optional.

```text
10 LET N = 5
20 FOR I = 1 TO N
30 PRINT I; " squared is "; I * I
40 NEXT I
```

Names ending in `$` hold text. Other names hold numbers, lists or
dictionaries.

```text
NAME$ = "Ada"
LIST L = 3, 1, 2
SORT L
PRINT L; " "; LEN(L)
DICT AGE = "ada": 36
PRINT AGE.ada
```

Structured blocks close with a matching keyword: `IF ... END IF`,
`WHILE ... WEND`, `DO ... LOOP`, `SELECT CASE ... END SELECT`,
`SUB ... END SUB`, `FUNCTION ... END FUNCTION` and `TRY ... END TRY`.

## PILOT

A PILOT command is a letter and a colon. `T:` types text, `A:` accepts
an answer and `M:` matches it against a list of words. A `Y` or `N` after
the letter makes the command run only when the last match succeeded or
failed.

```text
T:What colour is the sky?
A:
M:blue,grey
TY:Well done, $ANSWER it is.
TN:Look again.
J:*next
*next
E:
```

`$NAME` and `*NAME*` inside `T:` text are replaced by the variable.

## Logo

Logo commands move a turtle that starts in the middle of the canvas facing
up. Headings are degrees clockwise from up.

```text
TO BOX :SIDE
  REPEAT 4 [FORWARD :SIDE RIGHT 90]
END
SETCOLOR red
BOX 50
```

Run a file with `templecode run FILE --turtle` to see the drawing
instructions the turtle produces.

## When things go wrong

An error prints a line starting with `?` and the program carries on with
the next line. `THROW`, running out of stack and `STOP` end the run.
*/
